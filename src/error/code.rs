/// Error codes with category prefix
///
/// Categories:
/// - PRS: Registry / manifest parsing
/// - REG: Extension registry rules
/// - SUB: Submodule rules
/// - LIC: License checks
/// - MAN: Extension / package manifest rules
/// - PKG: Packaging and external processes
/// - STO: Blob store operations
/// - CFG: Configuration
/// - NET: Network connectivity
/// - IO: File system operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Parse errors (PRS001-PRS099)
    /// Malformed TOML / JSON / .gitmodules
    Prs001,

    // Registry errors (REG001-REG099)
    /// Invalid extension ID characters
    Reg001,
    /// Brand name used as ID prefix/suffix
    Reg002,
    /// Extension IDs renamed
    Reg003,

    // Submodule errors (SUB001-SUB099)
    /// Missing submodule URL
    Sub001,
    /// Non-HTTPS submodule URL
    Sub002,
    /// Unknown submodule
    Sub003,
    /// Submodule at unexpected location
    Sub004,

    // License errors (LIC001-LIC099)
    /// No license file
    Lic001,
    /// No accepted license text
    Lic002,

    // Manifest errors (MAN001-MAN099)
    /// Brand name used in display name
    Man001,
    /// Unsupported schema version
    Man002,
    /// ID differs from registry
    Man003,
    /// Version differs from registry
    Man004,
    /// Legacy extension.json
    Man005,

    // Packaging errors (PKG001-PKG099)
    /// Packaging tool failed
    Pkg001,
    /// Helper command failed
    Pkg002,

    // Store errors (STO001-STO099)
    /// Unexpected object key layout
    Sto001,
    /// Blob store request failed
    Sto002,

    // Config errors (CFG001-CFG099)
    /// Missing required setting
    Cfg001,

    // Network errors (NET001-NET099)
    /// Connection failed
    Net001,

    // I/O errors (IO001-IO099)
    /// File system operation failed
    Io001,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "REG001")
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Prs001 => "PRS001",
            ErrorCode::Reg001 => "REG001",
            ErrorCode::Reg002 => "REG002",
            ErrorCode::Reg003 => "REG003",
            ErrorCode::Sub001 => "SUB001",
            ErrorCode::Sub002 => "SUB002",
            ErrorCode::Sub003 => "SUB003",
            ErrorCode::Sub004 => "SUB004",
            ErrorCode::Lic001 => "LIC001",
            ErrorCode::Lic002 => "LIC002",
            ErrorCode::Man001 => "MAN001",
            ErrorCode::Man002 => "MAN002",
            ErrorCode::Man003 => "MAN003",
            ErrorCode::Man004 => "MAN004",
            ErrorCode::Man005 => "MAN005",
            ErrorCode::Pkg001 => "PKG001",
            ErrorCode::Pkg002 => "PKG002",
            ErrorCode::Sto001 => "STO001",
            ErrorCode::Sto002 => "STO002",
            ErrorCode::Cfg001 => "CFG001",
            ErrorCode::Net001 => "NET001",
            ErrorCode::Io001 => "IO001",
        }
    }

    /// Returns the general cause description
    pub fn cause(&self) -> &'static str {
        match self {
            ErrorCode::Prs001 => "A registry or manifest file could not be parsed",
            ErrorCode::Reg001 => "An extension ID contains characters outside [a-z0-9-]",
            ErrorCode::Reg002 => "An extension ID repeats the host brand name",
            ErrorCode::Reg003 => "Extension IDs were added and removed in the same change",
            ErrorCode::Sub001 => "A submodule entry has no URL",
            ErrorCode::Sub002 => "A submodule URL does not use HTTPS",
            ErrorCode::Sub003 => "An extension refers to a submodule that does not exist",
            ErrorCode::Sub004 => "A submodule is not located at extensions/<id>",
            ErrorCode::Lic001 => "The extension directory has no license file",
            ErrorCode::Lic002 => "No license file matches an accepted license text",
            ErrorCode::Man001 => "The extension display name repeats the host brand name",
            ErrorCode::Man002 => "The manifest declares an unsupported schema version",
            ErrorCode::Man003 => "extension.toml declares a different ID than the registry",
            ErrorCode::Man004 => "The packaged version differs from the registry version",
            ErrorCode::Man005 => "The extension still uses the legacy extension.json format",
            ErrorCode::Pkg001 => "The external packaging tool failed",
            ErrorCode::Pkg002 => "A helper command (git, packaging tool) failed",
            ErrorCode::Sto001 => "The blob store contains an object outside the expected layout",
            ErrorCode::Sto002 => "The blob store rejected a request",
            ErrorCode::Cfg001 => "A required setting is missing",
            ErrorCode::Net001 => "Unable to reach the blob store",
            ErrorCode::Io001 => "A file system operation failed",
        }
    }

    /// Returns remediation steps
    pub fn remediation(&self) -> &'static str {
        match self {
            ErrorCode::Prs001 => "1. Check the file syntax\n2. Run 'extpub sort' after fixing it",
            ErrorCode::Reg001 => "1. Use only lowercase letters, digits and hyphens in the ID",
            ErrorCode::Reg002 => "1. Drop the brand prefix/suffix from the ID",
            ErrorCode::Reg003 => "1. Keep the existing ID\n2. Change the display name in extension.toml instead",
            ErrorCode::Sub001 => "1. Add a url to the submodule entry in .gitmodules",
            ErrorCode::Sub002 => "1. Use an https:// URL for the submodule",
            ErrorCode::Sub003 => "1. Add the submodule with 'git submodule add'\n2. Check the submodule path in extensions.toml",
            ErrorCode::Sub004 => "1. Move the submodule to extensions/<id>",
            ErrorCode::Lic001 => "1. Add a LICENSE file to the extension root",
            ErrorCode::Lic002 => "1. Use the unmodified text of an accepted license",
            ErrorCode::Man001 => "1. Remove the brand name from the extension name",
            ErrorCode::Man002 => "1. Set schema_version = 1 in extension.toml",
            ErrorCode::Man003 => "1. Make the id in extension.toml match the registry key",
            ErrorCode::Man004 => "1. Bump the version in extensions.toml to match extension.toml",
            ErrorCode::Man005 => "1. Convert extension.json to extension.toml",
            ErrorCode::Pkg001 => "1. Inspect the tool output above\n2. Build the extension locally",
            ErrorCode::Pkg002 => "1. Inspect the command output above\n2. Check that git is installed",
            ErrorCode::Sto001 => "1. Remove the stray object from the bucket",
            ErrorCode::Sto002 => "1. Check the bucket name and credentials\n2. Retry later if the store is down",
            ErrorCode::Cfg001 => "1. Export the missing environment variable",
            ErrorCode::Net001 => "1. Check your internet connection\n2. Verify S3_ENDPOINT",
            ErrorCode::Io001 => "1. Verify the path exists\n2. Check file permissions",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ErrorCode; 22] = [
        ErrorCode::Prs001,
        ErrorCode::Reg001,
        ErrorCode::Reg002,
        ErrorCode::Reg003,
        ErrorCode::Sub001,
        ErrorCode::Sub002,
        ErrorCode::Sub003,
        ErrorCode::Sub004,
        ErrorCode::Lic001,
        ErrorCode::Lic002,
        ErrorCode::Man001,
        ErrorCode::Man002,
        ErrorCode::Man003,
        ErrorCode::Man004,
        ErrorCode::Man005,
        ErrorCode::Pkg001,
        ErrorCode::Pkg002,
        ErrorCode::Sto001,
        ErrorCode::Sto002,
        ErrorCode::Cfg001,
        ErrorCode::Net001,
        ErrorCode::Io001,
    ];

    #[test]
    fn all_error_codes_have_valid_string() {
        for code in ALL {
            let s = code.as_str();
            assert!(
                s.len() >= 5 && s.len() <= 6,
                "Error code string should be 5-6 characters: {}",
                s
            );
        }
    }

    #[test]
    fn all_error_codes_have_cause_and_remediation() {
        for code in ALL {
            assert!(!code.cause().is_empty(), "Cause should not be empty for {:?}", code);
            assert!(
                !code.remediation().is_empty(),
                "Remediation should not be empty for {:?}",
                code
            );
        }
    }

    #[test]
    fn error_code_strings_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.as_str()), "duplicate code {}", code.as_str());
        }
    }
}
