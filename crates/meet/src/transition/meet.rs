use rust_decimal::Decimal;

use super::check_day;
use crate::actions::{MeetPatch, SetPlatformCount, SetWeightClasses};
use crate::error::{MeetError, Result};
use crate::models::MeetState;
use crate::models::meet::DEFAULT_PLATFORMS_ON_DAY;

/// New days start with one platform; removed days drop their counts.
pub(super) fn set_length_days(meet: &mut MeetState, length: u32) {
    meet.length_days = length;
    meet.platforms_on_days.resize(length as usize, DEFAULT_PLATFORMS_ON_DAY);
}

pub(super) fn set_platform_count(meet: &mut MeetState, action: &SetPlatformCount) -> Result<()> {
    let idx = check_day(action.day, meet.length_days)?;
    if meet.platforms_on_days.len() <= idx {
        meet.platforms_on_days.resize(idx + 1, DEFAULT_PLATFORMS_ON_DAY);
    }
    meet.platforms_on_days[idx] = action.count;
    Ok(())
}

pub(super) fn set_weight_classes(meet: &mut MeetState, action: &SetWeightClasses) -> Result<()> {
    check_ascending(&action.classes_kg)?;
    *meet.weight_classes_mut(action.sex) = action.classes_kg.clone();
    Ok(())
}

pub(super) fn update_meet(meet: &mut MeetState, changes: &MeetPatch) -> Result<()> {
    for classes in [
        &changes.weight_classes_kg_men,
        &changes.weight_classes_kg_women,
        &changes.weight_classes_kg_mx,
    ]
    .into_iter()
    .flatten()
    {
        check_ascending(classes)?;
    }

    changes.clone().apply_to(meet);
    let length = meet.length_days;
    set_length_days(meet, length);
    Ok(())
}

fn check_ascending(classes: &[Decimal]) -> Result<()> {
    if let Some(pair) = classes.windows(2).find(|w| w[0] >= w[1]) {
        return Err(MeetError::InvalidWeightClasses(format!(
            "{} is followed by {}",
            pair[0], pair[1]
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sex;

    #[test]
    fn test_set_length_days_resizes_platforms() {
        let mut meet = MeetState::default();
        meet.platforms_on_days = vec![3];

        set_length_days(&mut meet, 3);
        assert_eq!(meet.platforms_on_days, vec![3, 1, 1]);

        set_length_days(&mut meet, 2);
        assert_eq!(meet.length_days, 2);
        assert_eq!(meet.platforms_on_days, vec![3, 1]);
    }

    #[test]
    fn test_set_platform_count_checks_day() {
        let mut meet = MeetState::default();
        set_length_days(&mut meet, 2);

        let action = SetPlatformCount { day: 2, count: 4 };
        set_platform_count(&mut meet, &action).unwrap();
        assert_eq!(meet.platforms_on_days, vec![1, 4]);

        let action = SetPlatformCount { day: 3, count: 4 };
        assert!(matches!(
            set_platform_count(&mut meet, &action),
            Err(MeetError::DayOutOfRange {
                day: 3,
                length_days: 2
            })
        ));
    }

    #[test]
    fn test_set_weight_classes_rejects_unsorted() {
        let mut meet = MeetState::default();
        let action = SetWeightClasses {
            sex: Sex::Mx,
            classes_kg: vec![Decimal::from(90), Decimal::from(60)],
        };
        assert!(set_weight_classes(&mut meet, &action).is_err());
        assert!(meet.weight_classes_kg_mx.is_empty());
    }

    #[test]
    fn test_update_meet_keeps_days_consistent() {
        let mut meet = MeetState::default();
        let changes = MeetPatch {
            length_days: Some(3),
            ..Default::default()
        };
        update_meet(&mut meet, &changes).unwrap();
        assert_eq!(meet.platforms_on_days.len(), 3);
    }
}
