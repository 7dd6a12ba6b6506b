//! Pairwise identity predicates.
//!
//! Every comparison folds both operands to lowercase before comparing, so
//! each predicate is symmetric in its two arguments.

use crate::model::{Address, MatchRule, Record};

/// Case-insensitive string equality without allocating folded copies.
pub fn fold_eq(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

impl Address {
    /// All five fields agree, ignoring case.
    pub fn matches(&self, other: &Address) -> bool {
        fold_eq(&self.street, &other.street)
            && fold_eq(&self.street_2, &other.street_2)
            && fold_eq(&self.postal_code, &other.postal_code)
            && fold_eq(&self.city, &other.city)
            && fold_eq(&self.region, &other.region)
    }
}

impl Record {
    /// False unless both sides carry an NPI and the two are equal.
    pub fn national_id_matches(&self, other: &Record) -> bool {
        if !self.has_national_id() || !other.has_national_id() {
            return false;
        }
        fold_eq(&self.national_id, &other.national_id)
    }

    /// First and last name both agree. No trimming or nickname handling.
    pub fn name_matches(&self, other: &Record) -> bool {
        fold_eq(&self.first_name, &other.first_name) && fold_eq(&self.last_name, &other.last_name)
    }

    /// Any address of `self` equals any address of `other`.
    ///
    /// Two records with no addresses do not match each other.
    pub fn address_matches(&self, other: &Record) -> bool {
        self.addresses
            .iter()
            .any(|own| other.addresses.iter().any(|theirs| own.matches(theirs)))
    }

    /// Top-level identity decision, reporting which rule decided it.
    ///
    /// When both records carry an NPI it is the only signal consulted: equal
    /// NPIs match regardless of name or address, different NPIs never match.
    /// Otherwise name and address must both agree.
    pub fn identity_rule(&self, other: &Record) -> Option<MatchRule> {
        if self.has_national_id() && other.has_national_id() {
            return self
                .national_id_matches(other)
                .then_some(MatchRule::NationalId);
        }
        (self.name_matches(other) && self.address_matches(other))
            .then_some(MatchRule::NameAndAddress)
    }

    pub fn identity_matches(&self, other: &Record) -> bool {
        self.identity_rule(other).is_some()
    }
}
