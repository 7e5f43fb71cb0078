//! テスト用インメモリストア

use super::*;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// テスト用インメモリストア
///
/// 一覧はキー順に `page_size` 件ずつ返す。
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    page_size: usize,
    list_calls: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_page_size(1000)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            page_size,
            list_calls: Mutex::new(0),
        }
    }

    /// オブジェクトを追加
    pub fn add(&self, key: &str, body: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), body.to_vec());
    }

    /// 保存済みのキー（キー順）
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    /// list_objects の呼び出し回数
    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }
}

impl BlobStore for MemoryStore {
    fn put_object<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        self.objects.lock().unwrap().insert(key.to_string(), body);
        Box::pin(async { Ok(()) })
    }

    fn list_objects<'a>(
        &'a self,
        prefix: &'a str,
        continuation: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<ObjectPage>> + Send + 'a>> {
        *self.list_calls.lock().unwrap() += 1;

        // 継続トークンは直前ページの最後のキー
        let matching: Vec<String> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .filter(|key| continuation.map_or(true, |after| key.as_str() > after))
            .cloned()
            .collect();

        let keys: Vec<String> = matching.iter().take(self.page_size).cloned().collect();
        let next_continuation = if matching.len() > keys.len() {
            keys.last().cloned()
        } else {
            None
        };

        Box::pin(async move {
            Ok(ObjectPage {
                keys,
                next_continuation,
            })
        })
    }
}
