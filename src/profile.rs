use log::debug;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::InvalidTermsError;
use crate::schedule::{
    check_extra_principal, extra_principal_rows, generate_baseline_schedule, ScheduleRow,
};
use crate::terms::LoanTerms;

/// Identifier handed out by a [`MortgageRegistry`]. Never reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ProfileId(u64);

impl ProfileId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A loan the user is tracking, with an optional monthly overpayment.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MortgageProfile {
    id: ProfileId,
    terms: LoanTerms,
    extra_monthly_principal: f64,
}

impl MortgageProfile {
    pub fn id(&self) -> ProfileId {
        self.id
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    /// Display name, falling back to the id.
    pub fn label(&self) -> String {
        match self.terms.name() {
            Some(name) => name.to_string(),
            None => self.id.to_string(),
        }
    }

    pub fn extra_monthly_principal(&self) -> f64 {
        self.extra_monthly_principal
    }

    pub fn set_extra_monthly_principal(&mut self, extra: f64) -> Result<(), InvalidTermsError> {
        check_extra_principal(extra)?;
        self.extra_monthly_principal = extra;
        Ok(())
    }

    pub fn monthly_payment(&self) -> f64 {
        self.terms.monthly_payment()
    }

    pub fn lifetime_interest(&self) -> f64 {
        self.terms.lifetime_interest()
    }

    pub fn baseline_schedule(&self) -> Vec<ScheduleRow> {
        generate_baseline_schedule(&self.terms)
    }

    /// Schedule with this profile's overpayment applied.
    pub fn extra_principal_schedule(&self) -> Vec<ScheduleRow> {
        // the setter keeps the amount valid
        extra_principal_rows(&self.terms, self.extra_monthly_principal)
    }
}

impl fmt::Display for MortgageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.terms)
    }
}

/// Session-scoped set of profiles, keyed by id in creation order.
#[derive(Debug, Default)]
pub struct MortgageRegistry {
    next_id: u64,
    profiles: BTreeMap<ProfileId, MortgageProfile>,
}

impl MortgageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a profile with the next id without storing it. The id stays
    /// consumed whether or not the profile is saved.
    pub fn create(&mut self, terms: LoanTerms) -> MortgageProfile {
        self.next_id += 1;
        let id = ProfileId(self.next_id);
        debug!("created profile {} for {}", id, terms);
        MortgageProfile {
            id,
            terms,
            extra_monthly_principal: 0.,
        }
    }

    /// Store a profile, replacing any previous one with the same id.
    pub fn save(&mut self, profile: MortgageProfile) -> ProfileId {
        let id = profile.id;
        self.profiles.insert(id, profile);
        id
    }

    pub fn add(&mut self, terms: LoanTerms) -> ProfileId {
        let profile = self.create(terms);
        self.save(profile)
    }

    pub fn get(&self, id: ProfileId) -> Option<&MortgageProfile> {
        self.profiles.get(&id)
    }

    pub fn get_mut(&mut self, id: ProfileId) -> Option<&mut MortgageProfile> {
        self.profiles.get_mut(&id)
    }

    pub fn remove(&mut self, id: ProfileId) -> Option<MortgageProfile> {
        self.profiles.remove(&id)
    }

    pub fn iter(&self) -> btree_map::Values<'_, ProfileId, MortgageProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl<'a> IntoIterator for &'a MortgageRegistry {
    type Item = &'a MortgageProfile;
    type IntoIter = btree_map::Values<'a, ProfileId, MortgageProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::MortgageRegistry;
    use crate::error::InvalidTermsError;
    use crate::terms::LoanTerms;
    use test_log::test;

    fn terms(principal: f64) -> LoanTerms {
        LoanTerms::new(principal, 5., 15).unwrap()
    }

    #[test]
    fn test_ids_increase_and_are_not_reused() {
        let mut registry = MortgageRegistry::new();
        let first = registry.add(terms(100000.));
        let unsaved = registry.create(terms(200000.));
        let third = registry.add(terms(300000.));

        assert_eq!(first.get(), 1);
        assert_eq!(unsaved.id().get(), 2);
        assert_eq!(third.get(), 3);
        assert_eq!(registry.len(), 2);
        assert!(registry.get(unsaved.id()).is_none());

        registry.remove(third);
        assert_eq!(registry.add(terms(400000.)).get(), 4);
    }

    #[test]
    fn test_registries_count_independently() {
        let mut a = MortgageRegistry::new();
        let mut b = MortgageRegistry::new();
        a.add(terms(1000.));
        a.add(terms(2000.));
        assert_eq!(b.add(terms(3000.)).get(), 1);
    }

    #[test]
    fn test_iterates_in_id_order() {
        let mut registry = MortgageRegistry::new();
        let late = registry.create(terms(1.));
        registry.add(terms(2.));
        registry.save(late);
        let ids: Vec<u64> = registry.iter().map(|p| p.id().get()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!((&registry).into_iter().count(), 2);
    }

    #[test]
    fn test_extra_monthly_principal() {
        let mut registry = MortgageRegistry::new();
        let id = registry.add(terms(100000.));
        let profile = registry.get_mut(id).unwrap();
        assert_eq!(profile.extra_monthly_principal(), 0.);
        assert_eq!(profile.extra_principal_schedule().len(), 179);

        profile.set_extra_monthly_principal(200.).unwrap();
        assert_eq!(profile.extra_principal_schedule().len(), 131);
        assert_eq!(profile.baseline_schedule().len(), 179);

        assert_eq!(
            profile.set_extra_monthly_principal(-1.),
            Err(InvalidTermsError::ExtraPrincipal(-1.))
        );
        assert_eq!(profile.extra_monthly_principal(), 200.);
    }

    #[test]
    fn test_profile_figures_and_label() {
        let mut registry = MortgageRegistry::new();
        let unnamed = registry.create(terms(100000.));
        assert_eq!(unnamed.label(), "#1");
        assert_eq!(unnamed.monthly_payment(), 790.79);
        assert_eq!(unnamed.lifetime_interest(), 42342.2);

        let named = registry.create(terms(100000.).with_name("Flat").unwrap());
        assert_eq!(named.label(), "Flat");
        assert_eq!(named.to_string(), "#2 Flat: principal 100000.00, APR 5%, 15 years");
    }
}
