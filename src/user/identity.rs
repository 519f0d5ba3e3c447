//! Identity generators: names, genders and dates for synthetic users.

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::error::{Result, UserSearchError};
use crate::user::Gender;
use crate::user::factory::DateWindow;

const MALE_FIRST_NAMES: &[&str] = &[
    "James", "John", "Robert", "Michael", "William", "David", "Richard", "Joseph", "Thomas",
    "Charles", "Daniel", "Matthew", "Anthony", "Mark", "Steven", "Paul", "Andrew", "Joshua",
    "Kenneth", "Kevin", "Brian", "George", "Timothy", "Ronald", "Jason", "Edward", "Jeffrey",
    "Ryan", "Jacob", "Gary",
];

const FEMALE_FIRST_NAMES: &[&str] = &[
    "Mary", "Patricia", "Jennifer", "Linda", "Elizabeth", "Barbara", "Susan", "Jessica", "Sarah",
    "Karen", "Lisa", "Nancy", "Betty", "Margaret", "Sandra", "Ashley", "Kimberly", "Emily",
    "Donna", "Michelle", "Carol", "Amanda", "Dorothy", "Melissa", "Deborah", "Stephanie",
    "Rebecca", "Sharon", "Laura", "Cynthia",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King", "Wright",
    "Scott", "Torres", "Nguyen", "Hill", "Flores",
];

/// A generated person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub gender: Gender,
    pub first_name: String,
    pub last_name: String,
}

/// Source of synthetic identities and dates.
pub trait IdentityGenerator {
    /// Draw an identity whose gender is one of `genders`.
    fn identity(&mut self, genders: &[Gender]) -> Result<Identity>;

    /// Draw a date uniformly from an inclusive window.
    fn date_in(&mut self, window: &DateWindow) -> Result<NaiveDate>;
}

/// [`IdentityGenerator`] backed by a seedable RNG and fixed name lists.
#[derive(Debug, Clone)]
pub struct RandomIdentityGenerator {
    rng: StdRng,
}

impl RandomIdentityGenerator {
    /// Generator seeded from the operating system.
    pub fn new() -> Self {
        RandomIdentityGenerator {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic generator for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        RandomIdentityGenerator {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pick(&mut self, names: &[&str]) -> Result<String> {
        names
            .choose(&mut self.rng)
            .map(|name| name.to_string())
            .ok_or_else(|| UserSearchError::generator("name list is empty"))
    }
}

impl Default for RandomIdentityGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityGenerator for RandomIdentityGenerator {
    fn identity(&mut self, genders: &[Gender]) -> Result<Identity> {
        let gender = *genders
            .choose(&mut self.rng)
            .ok_or_else(|| UserSearchError::generator("no gender to choose from"))?;
        let first_name = match gender {
            Gender::Male => self.pick(MALE_FIRST_NAMES)?,
            Gender::Female => self.pick(FEMALE_FIRST_NAMES)?,
        };
        let last_name = self.pick(LAST_NAMES)?;

        Ok(Identity {
            gender,
            first_name,
            last_name,
        })
    }

    fn date_in(&mut self, window: &DateWindow) -> Result<NaiveDate> {
        let offset = self.rng.random_range(0..=window.num_days());
        window
            .start()
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| UserSearchError::generator(format!("date out of range in {window}")))
    }
}
