use log::warn;
use wasm_bindgen::JsValue;
use web_sys::Window;

use stickyboard_shared::{BoardError, BoardResult, Storage};

/// `window.localStorage`. Pages where it is disabled still get a working
/// board; every read and write just fails with a storage error.
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

impl LocalStorage {
    pub fn open(window: &Window) -> Self {
        let inner = match window.local_storage() {
            Ok(Some(storage)) => Some(storage),
            Ok(None) => {
                warn!("localStorage is not available");
                None
            }
            Err(err) => {
                warn!("localStorage is blocked: {}", describe(&err));
                None
            }
        };
        Self { inner }
    }

    fn storage(&self) -> BoardResult<&web_sys::Storage> {
        self.inner
            .as_ref()
            .ok_or_else(|| BoardError::Storage("localStorage unavailable".into()))
    }
}

impl Storage for LocalStorage {
    fn load(&self, key: &str) -> BoardResult<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|err| BoardError::Storage(describe(&err)))
    }

    fn save(&mut self, key: &str, blob: &str) -> BoardResult<()> {
        self.storage()?
            .set_item(key, blob)
            .map_err(|err| BoardError::Storage(describe(&err)))
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
