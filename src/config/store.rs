use crate::config::settings::Settings;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::sync::{Arc, RwLock};

/// 保存目前生效的設定。
///
/// 讀取者拿到的是整份快照的 `Arc`；更新只能整份替換，驗證失敗時保留舊設定。
#[derive(Debug)]
pub struct SettingsStore {
    current: RwLock<Arc<Settings>>,
}

impl SettingsStore {
    pub fn new(initial: Settings) -> Result<Self> {
        initial.validate()?;
        Ok(Self {
            current: RwLock::new(Arc::new(initial)),
        })
    }

    pub fn snapshot(&self) -> Arc<Settings> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    pub fn replace(&self, settings: Settings) -> Result<Arc<Settings>> {
        settings.validate()?;
        let next = Arc::new(settings);

        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::clone(&next);

        tracing::info!(
            "Settings replaced (window {} min, {} vehicle class(es))",
            next.grouping_window_minutes,
            next.vehicle_types.len()
        );
        Ok(next)
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self {
            current: RwLock::new(Arc::new(Settings::default())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_replace_swaps_whole_snapshot() {
        let store = SettingsStore::default();
        let before = store.snapshot();

        let updated = Settings {
            grouping_window_minutes: 30,
            min_rows: 1,
            ..Settings::default()
        };
        store.replace(updated).unwrap();

        let after = store.snapshot();
        assert_eq!(before.grouping_window_minutes, 20);
        assert_eq!(after.grouping_window_minutes, 30);
        assert_eq!(after.min_rows, 1);
    }

    #[test]
    fn test_invalid_replacement_keeps_previous_settings() {
        let store = SettingsStore::default();
        let invalid = Settings {
            grouping_window_minutes: -1,
            ..Settings::default()
        };

        assert!(store.replace(invalid).is_err());
        assert_eq!(store.snapshot().grouping_window_minutes, 20);
    }

    #[test]
    fn test_concurrent_readers_see_consistent_snapshots() {
        let store = Arc::new(SettingsStore::default());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let snapshot = store.snapshot();
                        // window and min_rows are always replaced together
                        let paired = (snapshot.grouping_window_minutes == 20
                            && snapshot.min_rows == 10)
                            || (snapshot.grouping_window_minutes == 45
                                && snapshot.min_rows == 3);
                        assert!(paired);
                    }
                })
            })
            .collect();

        for _ in 0..50 {
            store
                .replace(Settings {
                    grouping_window_minutes: 45,
                    min_rows: 3,
                    ..Settings::default()
                })
                .unwrap();
            store.replace(Settings::default()).unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
