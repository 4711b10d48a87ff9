//! Favorites are hadith numbers, not positions, and are shared across books.

use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    numbers: HashSet<u32>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_numbers(numbers: impl IntoIterator<Item = u32>) -> Self {
        Self {
            numbers: numbers.into_iter().collect(),
        }
    }

    pub fn contains(&self, number: u32) -> bool {
        self.numbers.contains(&number)
    }

    /// Flip membership. Returns `true` if `number` is now a favorite.
    pub fn toggle(&mut self, number: u32) -> bool {
        if self.numbers.remove(&number) {
            false
        } else {
            self.numbers.insert(number);
            true
        }
    }

    pub fn insert(&mut self, number: u32) -> bool {
        self.numbers.insert(number)
    }

    pub fn remove(&mut self, number: u32) -> bool {
        self.numbers.remove(&number)
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn sorted(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self.numbers.iter().copied().collect();
        numbers.sort_unstable();
        numbers
    }

    /// Serialized as a sorted JSON array so the stored value is stable.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.sorted()).expect("a list of integers always serializes")
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let numbers: Vec<u32> = serde_json::from_str(json)?;
        Ok(Self::from_numbers(numbers))
    }
}
