//! AppID allocation for non-Steam shortcuts.

use std::collections::HashSet;

use rand::Rng;

use crate::SteamError;

/// Lowest AppID in the range Steam leaves to non-Steam games.
pub const APP_ID_MIN: u32 = 0xFF00_0000;

/// Highest AppID in the non-Steam range.
pub const APP_ID_MAX: u32 = 0xFFFF_FFFF;

/// Candidates drawn before [`allocate_app_id`] gives up.
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 1000;

/// Draws a random AppID from the non-Steam range using the thread-local CSPRNG.
pub fn generate_app_id() -> u32 {
    rand::thread_rng().gen_range(APP_ID_MIN..=APP_ID_MAX)
}

/// Returns true if `app_id` lies in the non-Steam range.
pub fn is_non_steam_app_id(app_id: u32) -> bool {
    app_id >= APP_ID_MIN
}

/// Picks an AppID not present in `taken`, retrying at most
/// [`MAX_ALLOCATION_ATTEMPTS`] times.
pub fn allocate_app_id(taken: &HashSet<u32>) -> Result<u32, SteamError> {
    allocate_with(taken, generate_app_id)
}

/// Allocation loop over an arbitrary candidate source.
pub(crate) fn allocate_with(
    taken: &HashSet<u32>,
    mut candidate: impl FnMut() -> u32,
) -> Result<u32, SteamError> {
    for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
        let app_id = candidate();
        if !taken.contains(&app_id) {
            return Ok(app_id);
        }
        tracing::warn!(app_id, attempt, "generated app id already in use, retrying");
    }

    Err(SteamError::AllocationExhausted {
        attempts: MAX_ALLOCATION_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_in_non_steam_range() {
        for _ in 0..1000 {
            let id = generate_app_id();
            assert!(id >= APP_ID_MIN);
            assert!(is_non_steam_app_id(id));
        }
    }

    #[test]
    fn range_boundaries() {
        assert!(!is_non_steam_app_id(APP_ID_MIN - 1));
        assert!(is_non_steam_app_id(APP_ID_MIN));
        assert!(is_non_steam_app_id(APP_ID_MAX));
    }

    #[test]
    fn allocate_skips_taken_ids() {
        let taken: HashSet<u32> = [APP_ID_MIN, APP_ID_MIN + 1].into_iter().collect();
        let mut candidates = [APP_ID_MIN, APP_ID_MIN + 1, APP_ID_MIN + 2].into_iter();

        let id = allocate_with(&taken, || candidates.next().unwrap()).unwrap();
        assert_eq!(id, APP_ID_MIN + 2);
    }

    #[test]
    fn allocate_gives_up_after_cap() {
        let taken: HashSet<u32> = [APP_ID_MIN].into_iter().collect();
        let mut calls = 0;

        let result = allocate_with(&taken, || {
            calls += 1;
            APP_ID_MIN
        });

        assert!(matches!(
            result,
            Err(SteamError::AllocationExhausted { attempts }) if attempts == MAX_ALLOCATION_ATTEMPTS
        ));
        assert_eq!(calls, MAX_ALLOCATION_ATTEMPTS);
    }

    #[test]
    fn allocate_with_empty_collection() {
        let id = allocate_app_id(&HashSet::new()).unwrap();
        assert!(is_non_steam_app_id(id));
    }
}
