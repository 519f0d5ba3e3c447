//! Property tests for synthetic record generation.

use chrono::{Datelike, Days, NaiveDate};
use proptest::prelude::*;

use usersearch::user::{DateWindow, FactoryConfig, RandomIdentityGenerator, RecordFactory, age_on};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 6, 15).unwrap()
}

proptest! {
    /// Every record lies in its window, was created before it was last
    /// online, and carries the age derived from its birth date.
    #[test]
    fn prop_generated_records_are_consistent(seed: u64, count in 0usize..60) {
        let config = FactoryConfig::default();
        let created = DateWindow::parse(&config.created_at.0, &config.created_at.1).unwrap();
        let online = DateWindow::parse(&config.last_online_at.0, &config.last_online_at.1).unwrap();
        let born = DateWindow::parse(&config.birth_date.0, &config.birth_date.1).unwrap();

        let mut factory = RecordFactory::new(config, RandomIdentityGenerator::seeded(seed))
            .unwrap()
            .with_today(today())
            .unwrap();
        let records = factory.generate(count).unwrap();

        prop_assert_eq!(records.len(), count);
        for (i, record) in records.iter().enumerate() {
            prop_assert_eq!(record.id, 1000 + i as u64);
            prop_assert!(created.contains(record.created_at));
            prop_assert!(online.contains(record.last_online_at));
            prop_assert!(born.contains(record.birth_date));
            prop_assert!(record.created_at < record.last_online_at);
            prop_assert_eq!(record.age, age_on(record.birth_date, today()));
            prop_assert!(!record.first_name.is_empty());
            prop_assert!(!record.last_name.is_empty());
        }
    }

    /// A birthday one day past today's calendar position yields one year less
    /// than a birthday one day before it.
    #[test]
    fn prop_age_counts_birthday(years_back in 1u64..80, day_offset in 2u64..360) {
        let today = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap() + Days::new(day_offset);
        let anniversary = today.with_year(today.year() - years_back as i32).unwrap();

        let day_before = anniversary - Days::new(1);
        let day_after = anniversary + Days::new(1);

        prop_assert_eq!(age_on(anniversary, today) as u64, years_back);
        prop_assert_eq!(age_on(day_before, today), age_on(day_after, today) + 1);
    }
}
