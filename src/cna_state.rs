use serde::{Deserialize, Serialize};

/// Discrete copy number alteration state relative to a diploid genome
///
/// The integer codes are the signed values expected by downstream consumers of the CNA tables.
///
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    strum::Display,
    strum::EnumCount,
    strum::EnumIter,
    strum::FromRepr,
)]
#[repr(i8)]
pub enum CnaState {
    #[strum(to_string = "Deep Deletion")]
    DeepDeletion = -2,
    #[strum(to_string = "Shallow Deletion")]
    ShallowDeletion = -1,
    #[strum(to_string = "Neutral")]
    Neutral = 0,
    #[strum(to_string = "Gain")]
    Gain = 1,
    #[strum(to_string = "Amplification")]
    Amplification = 2,
}

impl CnaState {
    pub fn code(&self) -> i8 {
        *self as i8
    }

    /// True for every state other than neutral
    pub fn is_non_diploid(&self) -> bool {
        *self != CnaState::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn test_codes() {
        assert_eq!(CnaState::DeepDeletion.code(), -2);
        assert_eq!(CnaState::ShallowDeletion.code(), -1);
        assert_eq!(CnaState::Neutral.code(), 0);
        assert_eq!(CnaState::Gain.code(), 1);
        assert_eq!(CnaState::Amplification.code(), 2);
        assert_eq!(CnaState::COUNT, 5);
    }

    #[test]
    fn test_from_repr() {
        for state in CnaState::iter() {
            assert_eq!(CnaState::from_repr(state.code()), Some(state));
        }
        assert_eq!(CnaState::from_repr(3), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(CnaState::ShallowDeletion.to_string(), "Shallow Deletion");
        assert_eq!(CnaState::Amplification.to_string(), "Amplification");
        assert!(!CnaState::Neutral.is_non_diploid());
        assert!(CnaState::Gain.is_non_diploid());
    }
}
