use std::collections::HashSet;

use rand::distr::Alphanumeric;
use rand::Rng;

pub const ITEM_ID_LEN: usize = 8;

/// Generates item ids that are unique for the lifetime of a session.
///
/// Ids are random strings over `[A-Za-z0-9]`; every issued id is remembered
/// so a collision is simply redrawn.
#[derive(Debug, Default)]
pub struct IdGenerator {
    issued: HashSet<String>,
}

impl IdGenerator {
    pub fn next_id(&mut self) -> String {
        let mut rng = rand::rng();
        loop {
            let id: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(ITEM_ID_LEN)
                .map(char::from)
                .collect();
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn issued(&self) -> usize {
        self.issued.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_alphanumeric_and_fixed_length() {
        let mut ids = IdGenerator::default();
        let id = ids.next_id();
        assert_eq!(id.len(), ITEM_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn ten_thousand_ids_are_distinct() {
        let mut ids = IdGenerator::default();
        let all: HashSet<String> = (0..10_000).map(|_| ids.next_id()).collect();
        assert_eq!(all.len(), 10_000);
        assert_eq!(ids.issued(), 10_000);
    }
}
