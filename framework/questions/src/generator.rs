use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::Strategy;

/// How many prompts each strategy produces.
pub const QUESTIONS_PER_SET: usize = 8;

/// Generates prompt sets from an explicit seed.
///
/// The generator owns its own [StdRng] constructed from the seed, so it never touches process
/// global random state and two generators built from the same seed produce identical output.
#[derive(Debug)]
pub struct QuestionGenerator {
    rng: StdRng,
}

impl QuestionGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate the prompt set for a strategy.
    pub fn generate(&mut self, strategy: Strategy) -> Vec<String> {
        match strategy {
            Strategy::Historical => self.historical_questions(),
            Strategy::Mathematical => self.mathematical_questions(),
            Strategy::Geographical => self.geographical_questions(),
            Strategy::Hypothetical => self.hypothetical_questions(),
            Strategy::Technical => self.technical_questions(),
            Strategy::Mixed => self.mixed_questions(),
        }
    }

    fn historical_questions(&mut self) -> Vec<String> {
        let year = self.rng.gen_range(1000..=2023);

        vec![
            format!("What major events occurred in the year {year}?"),
            format!("Who were the influential leaders during {year}?"),
            format!("What was the state of technology in {year}?"),
            format!("Describe the political climate of {year}."),
            format!("What were the major conflicts or peace treaties around {year}?"),
            format!("How did people communicate in {year}?"),
            format!("What was daily life like for common people in {year}?"),
            format!("What scientific discoveries were made around {year}?"),
        ]
    }

    fn mathematical_questions(&mut self) -> Vec<String> {
        let a: u32 = self.rng.gen_range(100..=9999);
        let b: u32 = self.rng.gen_range(100..=9999);
        let c: u32 = self.rng.gen_range(2..=50);

        vec![
            format!("What is {a} multiplied by {b}?"),
            format!("If you divide the previous result by {c}, what do you get?"),
            format!("What are the prime factors of {a}?"),
            format!("Is {b} a perfect square? If not, what's the nearest one?"),
            format!("Calculate {a} to the power of {}.", c % 5 + 2),
            format!("What is the greatest common divisor of {a} and {b}?"),
            format!("Convert {a} to base-{} notation.", c % 7 + 2),
            format!("How many ways can you partition {c} into positive integers?"),
        ]
    }

    fn geographical_questions(&mut self) -> Vec<String> {
        const CITIES: [&str; 18] = [
            "Tokyo",
            "Delhi",
            "Shanghai",
            "São Paulo",
            "Mexico City",
            "Cairo",
            "Mumbai",
            "Beijing",
            "Dhaka",
            "Osaka",
            "Karachi",
            "Istanbul",
            "Buenos Aires",
            "Kolkata",
            "Lagos",
            "Manila",
            "Tianjin",
            "Rio",
        ];

        const COUNTRIES: [&str; 17] = [
            "Brazil",
            "Russia",
            "India",
            "China",
            "South Africa",
            "Mexico",
            "Indonesia",
            "Turkey",
            "Saudi Arabia",
            "Argentina",
            "Egypt",
            "Nigeria",
            "Japan",
            "Germany",
            "France",
            "Italy",
            "Canada",
        ];

        // The slices are never empty so choose cannot fail.
        let city = CITIES.choose(&mut self.rng).copied().unwrap_or("Tokyo");
        let country = COUNTRIES.choose(&mut self.rng).copied().unwrap_or("Japan");
        let distance = self.rng.gen_range(500..=5000);

        vec![
            format!("What is the population of {city}?"),
            format!("What are the neighboring countries of {country}?"),
            format!("What is the main river flowing through or near {city}?"),
            format!("If you travel {distance}km east from {city}, where might you be?"),
            format!("What is the climate type in {country}?"),
            format!("What are the major exports of {country}?"),
            format!("What language is primarily spoken in {city}?"),
            format!("What is the time zone of {city}?"),
        ]
    }

    fn hypothetical_questions(&mut self) -> Vec<String> {
        const OBJECTS: [&str; 6] = ["cars", "trees", "buildings", "phones", "books", "computers"];
        const PROPERTIES: [&str; 5] = [
            "invisible",
            "magnetic",
            "telepathic",
            "indestructible",
            "sentient",
        ];
        const NUMBERS: [u32; 5] = [10, 50, 100, 1000, 10000];

        let object = OBJECTS.choose(&mut self.rng).copied().unwrap_or("cars");
        let property = PROPERTIES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or("invisible");
        let number = NUMBERS.choose(&mut self.rng).copied().unwrap_or(100);
        let percent = self.rng.gen_range(10..=90);

        vec![
            format!("What would happen if all {object} suddenly became {property}?"),
            format!("How would society change if {percent}% of people could read minds?"),
            format!("Design a city that could accommodate {number} million people in 1 square km."),
            format!("What if gravity was {percent}% stronger?"),
            "How would communication work if sound didn't exist?".to_string(),
            format!("What if {object} could only last for 24 hours before disappearing?"),
            format!("Describe an economy where {object} are the primary currency."),
            "What safety measures would we need if everyone could fly?".to_string(),
        ]
    }

    fn technical_questions(&mut self) -> Vec<String> {
        let array_size = self.rng.gen_range(10..=1000);
        let port = self.rng.gen_range(3000..=9999);
        let short_code = format!("{:08x}", self.rng.gen::<u32>());

        vec![
            format!("What's the best sorting algorithm for {array_size} nearly-sorted integers?"),
            format!("How would you design a cache for {array_size} frequently accessed items?"),
            format!("Explain the trade-offs of using a hash table with {array_size} buckets."),
            format!("What happens when you try to connect to port {port}?"),
            format!("Design a URL shortener that generates codes like '{short_code}'."),
            format!("How would you find duplicates in an array of {array_size} elements?"),
            format!("What's the space complexity of storing {array_size} items in a binary tree?"),
            format!("How would you implement rate limiting for {array_size} requests per second?"),
        ]
    }

    /// Two prompts sampled from each concrete strategy, truncated to one set's worth.
    fn mixed_questions(&mut self) -> Vec<String> {
        let mut questions = Vec::with_capacity(QUESTIONS_PER_SET);

        for strategy in Strategy::CONCRETE {
            // Each sub-strategy gets its own derived seed so the sets stay independent.
            let sub_seed = self.rng.gen::<u64>();
            let set = QuestionGenerator::new(sub_seed).generate(strategy);

            questions.extend(set.choose_multiple(&mut self.rng, 2).cloned());
        }

        questions.truncate(QUESTIONS_PER_SET);
        questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn same_seed_same_questions() {
        for strategy in [
            Strategy::Historical,
            Strategy::Mathematical,
            Strategy::Geographical,
            Strategy::Hypothetical,
            Strategy::Technical,
            Strategy::Mixed,
        ] {
            let first = QuestionGenerator::new(99).generate(strategy);
            let second = QuestionGenerator::new(99).generate(strategy);
            assert_eq!(first, second, "strategy {strategy} is not deterministic");
        }
    }

    #[test]
    fn every_strategy_yields_a_full_set() {
        for strategy in [
            Strategy::Historical,
            Strategy::Mathematical,
            Strategy::Geographical,
            Strategy::Hypothetical,
            Strategy::Technical,
            Strategy::Mixed,
        ] {
            let set = QuestionGenerator::new(7).generate(strategy);
            assert_eq!(set.len(), QUESTIONS_PER_SET);
        }
    }

    #[test]
    fn different_seeds_vary_the_parameters() {
        let first = QuestionGenerator::new(0).generate(Strategy::Mathematical);
        let second = QuestionGenerator::new(1).generate(Strategy::Mathematical);
        assert_ne!(first, second);
    }

    #[test]
    fn mixed_draws_from_multiple_strategies() {
        let set = QuestionGenerator::new(123).generate(Strategy::Mixed);

        // Two prompts from each of the five concrete strategies, truncated to eight, means the
        // set must contain prompts from at least four distinct strategies.
        assert_eq!(set.len(), QUESTIONS_PER_SET);
        let unique: std::collections::HashSet<_> = set.iter().collect();
        assert_eq!(unique.len(), set.len(), "mixed set contains duplicates");
    }
}
