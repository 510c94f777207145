//! Common utilities for benchmarks.
//!
//! Provides dataset generators with fixed seeds for reproducibility.

#![allow(dead_code)]

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

use descval::dataset::{Dataset, DescriptionRow, PublicationRow};

/// Fixed seed for reproducible benchmark data
const SEED: u64 = 42;

/// Create a seeded RNG for reproducible test data
pub fn seeded_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(SEED)
}

const WORDS: &[&str] = &[
    "книга", "роман", "история", "герой", "город", "семья", "война", "любовь", "тайна", "путь",
    "время", "мир", "дом", "жизнь", "судьба",
];

/// Generate a sentence of `len` words drawn from a small vocabulary.
fn sentence(rng: &mut ChaCha8Rng, len: usize) -> String {
    (0..len)
        .map(|_| WORDS[rng.random_range(0..WORDS.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Description rows for the absolute and blind workflows.
pub fn generate_description_rows(count: usize) -> Vec<DescriptionRow> {
    let mut rng = seeded_rng();
    (0..count)
        .map(|i| DescriptionRow {
            title: format!("Книга {}", i),
            gen_desc: sentence(&mut rng, 40),
            true_desc: sentence(&mut rng, 40),
        })
        .collect()
}

/// Publication rows for the three-way workflow.
pub fn generate_publication_rows(count: usize) -> Vec<PublicationRow> {
    let mut rng = seeded_rng();
    (0..count)
        .map(|i| PublicationRow {
            title: format!("Публикация {}", i),
            desc: sentence(&mut rng, 20),
            beginning: sentence(&mut rng, 60),
            continuation: sentence(&mut rng, 60),
            generated_baseline: sentence(&mut rng, 60),
            generated_finetuned: sentence(&mut rng, 60),
        })
        .collect()
}

pub fn blind_dataset(count: usize) -> Dataset {
    Dataset::Blind(generate_description_rows(count))
}

pub fn three_way_dataset(count: usize) -> Dataset {
    Dataset::ThreeWay(generate_publication_rows(count))
}

/// Serialize publication rows as an uploadable CSV.
pub fn three_way_csv(count: usize) -> Vec<u8> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in generate_publication_rows(count) {
        writer.serialize(row).unwrap();
    }
    writer.into_inner().unwrap()
}
