//! Record factory: bounded sets of synthetic users with derived ages.

use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, UserSearchError};
use crate::user::identity::IdentityGenerator;
use crate::user::{Gender, UserRecord};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default first id; ids are `id_base + position`.
pub const DEFAULT_ID_BASE: u64 = 1000;

/// Largest id a record may carry; ids are indexed as signed integers.
pub const MAX_ID: u64 = i64::MAX as u64;

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(UserSearchError::invalid_config(format!(
                "date window starts after it ends: {start}..{end}"
            )));
        }
        Ok(DateWindow { start, end })
    }

    /// Parse a window from two `YYYY-MM-DD` dates.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Days between start and end; 0 for a single-day window.
    pub fn num_days(&self) -> u64 {
        (self.end - self.start).num_days().unsigned_abs()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| UserSearchError::invalid_config(format!("invalid date '{s}': {e}")))
}

/// Full years elapsed between `birth` and `today`.
///
/// A Feb 29 birthday is reached on Mar 1 in non-leap years. Never negative.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// Raw factory settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryConfig {
    pub id_base: u64,
    /// Window for `created_at`.
    pub created_at: (String, String),
    /// Window for `last_online_at`; must start after `created_at` ends.
    pub last_online_at: (String, String),
    /// Window for `birthdate`; must end before today.
    pub birth_date: (String, String),
    /// Genders to draw from.
    pub genders: Vec<Gender>,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        FactoryConfig {
            id_base: DEFAULT_ID_BASE,
            created_at: ("2019-04-01".into(), "2020-03-02".into()),
            last_online_at: ("2020-03-03".into(), "2020-06-02".into()),
            birth_date: ("1955-08-22".into(), "2002-08-01".into()),
            genders: Gender::ALL.to_vec(),
        }
    }
}

/// Produces synthetic [`UserRecord`]s.
#[derive(Debug)]
pub struct RecordFactory<G: IdentityGenerator> {
    generator: G,
    id_base: u64,
    created_at: DateWindow,
    last_online_at: DateWindow,
    birth_date: DateWindow,
    genders: Vec<Gender>,
    /// Pinned date for age computation; `None` follows the clock.
    today: Option<NaiveDate>,
}

impl<G: IdentityGenerator> RecordFactory<G> {
    /// Create a factory, validating the configuration once.
    pub fn new(config: FactoryConfig, generator: G) -> Result<Self> {
        let created_at = DateWindow::parse(&config.created_at.0, &config.created_at.1)?;
        let last_online_at =
            DateWindow::parse(&config.last_online_at.0, &config.last_online_at.1)?;
        let birth_date = DateWindow::parse(&config.birth_date.0, &config.birth_date.1)?;

        if created_at.end() >= last_online_at.start() {
            return Err(UserSearchError::invalid_config(format!(
                "created_at window {created_at} must end before last_online_at window {last_online_at}"
            )));
        }
        if config.genders.is_empty() {
            return Err(UserSearchError::invalid_config("gender set is empty"));
        }
        if config.id_base > MAX_ID {
            return Err(UserSearchError::invalid_config(format!(
                "id base {} exceeds the largest id {MAX_ID}",
                config.id_base
            )));
        }

        let factory = RecordFactory {
            generator,
            id_base: config.id_base,
            created_at,
            last_online_at,
            birth_date,
            genders: config.genders,
            today: None,
        };
        factory.check_today(factory.today())?;

        Ok(factory)
    }

    /// Compute ages relative to a fixed date instead of the current one.
    pub fn with_today(mut self, today: NaiveDate) -> Result<Self> {
        self.check_today(today)?;
        self.today = Some(today);
        Ok(self)
    }

    fn check_today(&self, today: NaiveDate) -> Result<()> {
        if self.birth_date.end() >= today {
            return Err(UserSearchError::invalid_config(format!(
                "birthdate window {} must end before {today}",
                self.birth_date
            )));
        }
        Ok(())
    }

    /// The pinned date, or the current UTC date.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Last id of a run of `count` records, if every id fits.
    fn last_id(&self, count: usize) -> Result<u64> {
        let span = (count as u64).saturating_sub(1);
        self.id_base
            .checked_add(span)
            .filter(|id| *id <= MAX_ID)
            .ok_or_else(|| {
                UserSearchError::invalid_config(format!(
                    "{count} records starting at id {} exceed the largest id {MAX_ID}",
                    self.id_base
                ))
            })
    }

    /// Generate `count` records with ids `id_base..id_base + count`.
    ///
    /// Ages are computed against [`today`](Self::today), read once per call.
    pub fn generate(&mut self, count: usize) -> Result<Vec<UserRecord>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let last_id = self.last_id(count)?;
        let today = self.today();
        self.check_today(today)?;

        let mut records = Vec::with_capacity(count);

        for (position, id) in (self.id_base..=last_id).enumerate() {
            let created_at = self.generator.date_in(&self.created_at)?;
            let last_online_at = self.generator.date_in(&self.last_online_at)?;
            let birth_date = self.generator.date_in(&self.birth_date)?;
            let identity = self.generator.identity(&self.genders)?;

            log::trace!("Generated record {position} (id {id})");
            records.push(UserRecord {
                id,
                first_name: identity.first_name,
                last_name: identity.last_name,
                gender: identity.gender,
                birth_date,
                age: age_on(birth_date, today),
                created_at,
                last_online_at,
            });
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::identity::RandomIdentityGenerator;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn factory() -> RecordFactory<RandomIdentityGenerator> {
        RecordFactory::new(FactoryConfig::default(), RandomIdentityGenerator::seeded(3))
            .unwrap()
            .with_today(date("2020-06-15"))
            .unwrap()
    }

    #[test]
    fn test_age_on() {
        let today = date("2020-06-15");

        assert_eq!(age_on(date("1990-06-14"), today), 30);
        assert_eq!(age_on(date("1990-06-15"), today), 30);
        assert_eq!(age_on(date("1990-06-16"), today), 29);
        assert_eq!(age_on(date("2020-06-15"), today), 0);
        assert_eq!(age_on(date("2021-01-01"), today), 0);
    }

    #[test]
    fn test_age_on_leap_day() {
        let birth = date("2000-02-29");

        assert_eq!(age_on(birth, date("2021-02-28")), 20);
        assert_eq!(age_on(birth, date("2021-03-01")), 21);
        assert_eq!(age_on(birth, date("2024-02-29")), 24);
    }

    #[test]
    fn test_date_window() {
        let window = DateWindow::parse("2020-03-03", "2020-06-02").unwrap();

        assert!(window.contains(date("2020-03-03")));
        assert!(window.contains(date("2020-06-02")));
        assert!(!window.contains(date("2020-06-03")));
        assert_eq!(window.num_days(), 91);
        assert_eq!(window.to_string(), "2020-03-03..2020-06-02");

        assert!(DateWindow::parse("2020-06-02", "2020-03-03").is_err());
        assert!(DateWindow::parse("2 Jan 2006", "2020-03-03").is_err());
    }

    #[test]
    fn test_generate_ids_and_windows() {
        let mut factory = factory();
        let records = factory.generate(20).unwrap();

        assert_eq!(records.len(), 20);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.id, DEFAULT_ID_BASE + i as u64);
            assert!(factory.created_at.contains(record.created_at));
            assert!(factory.last_online_at.contains(record.last_online_at));
            assert!(factory.birth_date.contains(record.birth_date));
            assert!(record.created_at < record.last_online_at);
            assert_eq!(record.age, age_on(record.birth_date, factory.today()));
        }
    }

    #[test]
    fn test_generate_zero() {
        assert!(factory().generate(0).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_overlapping_windows() {
        let config = FactoryConfig {
            last_online_at: ("2020-03-02".into(), "2020-06-02".into()),
            ..FactoryConfig::default()
        };

        assert!(RecordFactory::new(config, RandomIdentityGenerator::seeded(0)).is_err());
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = FactoryConfig {
            genders: Vec::new(),
            ..FactoryConfig::default()
        };
        assert!(RecordFactory::new(config, RandomIdentityGenerator::seeded(0)).is_err());

        let config = FactoryConfig {
            birth_date: ("1955-08-22".into(), "not a date".into()),
            ..FactoryConfig::default()
        };
        assert!(RecordFactory::new(config, RandomIdentityGenerator::seeded(0)).is_err());

        let factory = RecordFactory::new(FactoryConfig::default(), RandomIdentityGenerator::seeded(0))
            .unwrap();
        assert!(factory.with_today(date("2002-08-01")).is_err());
    }

    #[test]
    fn test_rejects_ids_beyond_i64() {
        let config = FactoryConfig {
            id_base: MAX_ID + 1,
            ..FactoryConfig::default()
        };
        assert!(RecordFactory::new(config, RandomIdentityGenerator::seeded(0)).is_err());

        let config = FactoryConfig {
            id_base: u64::MAX,
            ..FactoryConfig::default()
        };
        assert!(RecordFactory::new(config, RandomIdentityGenerator::seeded(0)).is_err());
    }

    #[test]
    fn test_generate_stops_at_largest_id() {
        let config = FactoryConfig {
            id_base: MAX_ID,
            ..FactoryConfig::default()
        };
        let mut factory = RecordFactory::new(config, RandomIdentityGenerator::seeded(0)).unwrap();

        let records = factory.generate(1).unwrap();
        assert_eq!(records[0].id, MAX_ID);

        let err = factory.generate(2).unwrap_err();
        assert!(err.to_string().contains("exceed the largest id"));
        assert!(factory.generate(usize::MAX).is_err());
    }

    #[test]
    fn test_unpinned_today_follows_clock() {
        let mut factory =
            RecordFactory::new(FactoryConfig::default(), RandomIdentityGenerator::seeded(5)).unwrap();

        let before = Utc::now().date_naive();
        let records = factory.generate(10).unwrap();
        let after = Utc::now().date_naive();

        for record in &records {
            let age = record.age;
            assert!(age == age_on(record.birth_date, before) || age == age_on(record.birth_date, after));
        }
        assert!(factory.today() >= before);
    }
}
