use core::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::collections::LinkedSequence;

/// ages are computed against this year
pub const REFERENCE_YEAR: i32 = 2023;

pub const LAST_NAMES: [&str; 10] = [
    "Ivanov",
    "Petrov",
    "Alexandrov",
    "Vladislavov",
    "Dmitriev",
    "Sergeev",
    "Davidov",
    "Maksimov",
    "Semenov",
    "Bogdanov",
];

pub const FIRST_NAMES: [&str; 10] = [
    "Ivan",
    "Petr",
    "Semen",
    "Alex",
    "Vladislav",
    "Dmitriy",
    "Sergey",
    "David",
    "Maksim",
    "Bogdan",
];

pub const PATRONYMICS: [&str; 10] = [
    "Ivanovich",
    "Petrovich",
    "Alexandrovich",
    "Vladislavovich",
    "Dmitrievich",
    "Sergeevich",
    "Davidovich",
    "Maksimovich",
    "Semenovich",
    "Bogdanovich",
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DateOfBirth {
    pub day: u8,
    pub month: u8,
    pub year: i32,
}

impl DateOfBirth {
    /// day 1..=31 and month 1..=12 drawn independently, year 1980..=2020
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            day: rng.gen_range(1..=31),
            month: rng.gen_range(1..=12),
            year: rng.gen_range(1980..=2020),
        }
    }
}

impl fmt::Display for DateOfBirth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.day, self.month, self.year)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Person {
    pub last_name: String,
    pub first_name: String,
    pub patronymic: String,
    pub dob: DateOfBirth,
}

impl Person {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        // the name tables are non-empty so `choose` always returns Some
        let mut pick = |names: &[&str]| {
            names
                .choose(&mut *rng)
                .copied()
                .unwrap_or_default()
                .to_string()
        };
        let last_name = pick(&LAST_NAMES);
        let first_name = pick(&FIRST_NAMES);
        let patronymic = pick(&PATRONYMICS);
        Self {
            last_name,
            first_name,
            patronymic,
            dob: DateOfBirth::random(rng),
        }
    }

    pub fn age(&self) -> i32 {
        REFERENCE_YEAR - self.dob.year
    }
}

pub fn random_people<R: Rng + ?Sized>(count: usize, rng: &mut R) -> LinkedSequence<Person> {
    (0..count).map(|_| Person::random(&mut *rng)).collect()
}

#[derive(Debug)]
pub struct Partition {
    /// age < 20
    pub under_20: LinkedSequence<Person>,
    /// age > 30
    pub over_30: LinkedSequence<Person>,
    /// both of the above, in the order they were met
    pub merged: LinkedSequence<Person>,
    /// entries of `merged` with 20 < age < 30, always 0 for a correct split
    pub mistakes: usize,
}

/// split people into under 20 and over 30, building the merged list at the
/// same time, then recount the merged list against the complementary range
#[tracing::instrument(skip(people), fields(people = people.len()))]
pub fn partition_people(people: &LinkedSequence<Person>) -> Partition {
    let mut under_20 = LinkedSequence::new();
    let mut over_30 = LinkedSequence::new();
    let mut merged = LinkedSequence::new();

    for person in people {
        let age = person.age();
        if age < 20 {
            under_20.push_back(person.clone());
            merged.push_back(person.clone());
        } else if age > 30 {
            over_30.push_back(person.clone());
            merged.push_back(person.clone());
        }
    }

    let mistakes = merged
        .iter()
        .filter(|p| p.age() > 20 && p.age() < 30)
        .count();

    tracing::info!(
        under_20 = under_20.len(),
        over_30 = over_30.len(),
        merged = merged.len(),
        mistakes,
        "partitioned people by age"
    );

    Partition {
        under_20,
        over_30,
        merged,
        mistakes,
    }
}
