//! Resolution index: API version -> channel -> add-on id -> winning package
//!
//! Ids are compared without regard to case, so `Foo` and `foo` share an entry.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::source::types::{Channel, Package, PackageKey};
use crate::version::Version;

/// Winning packages of one channel, keyed by case-folded add-on id
pub type ChannelSlot = BTreeMap<PackageKey, Rc<Package>>;

/// Per-channel slots of one API version
///
/// Every channel has a slot, empty or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTable {
    slots: BTreeMap<Channel, ChannelSlot>,
}

impl ChannelTable {
    fn new() -> Self {
        Self {
            slots: Channel::ALL
                .into_iter()
                .map(|channel| (channel, ChannelSlot::new()))
                .collect(),
        }
    }

    pub fn get(&self, channel: Channel, id: &str) -> Option<&Package> {
        self.slots
            .get(&channel)?
            .get(&PackageKey::new(id))
            .map(Rc::as_ref)
    }

    pub fn slot(&self, channel: Channel) -> Option<&ChannelSlot> {
        self.slots.get(&channel)
    }

    /// Channels with their slots, in `Channel` order
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &ChannelSlot)> {
        self.slots.iter().map(|(channel, slot)| (*channel, slot))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.values().all(BTreeMap::is_empty)
    }

    fn slot_mut(&mut self, channel: Channel) -> &mut ChannelSlot {
        self.slots.entry(channel).or_default()
    }
}

/// Newest compatible package per (API version, channel, add-on id)
///
/// Built by [`Resolver`](crate::transform::resolver::Resolver) and handed
/// to the materializer by value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolutionIndex {
    tables: BTreeMap<Version, ChannelTable>,
    languages: BTreeSet<String>,
}

impl ResolutionIndex {
    /// An index with an empty table for each distinct API version
    pub fn with_api_versions(api_versions: impl IntoIterator<Item = Version>) -> Self {
        Self {
            tables: api_versions
                .into_iter()
                .map(|version| (version, ChannelTable::new()))
                .collect(),
            languages: BTreeSet::new(),
        }
    }

    pub fn api_versions(&self) -> impl DoubleEndedIterator<Item = &Version> {
        self.tables.keys()
    }

    pub fn table(&self, api_version: &Version) -> Option<&ChannelTable> {
        self.tables.get(api_version)
    }

    pub fn get(&self, api_version: &Version, channel: Channel, id: &str) -> Option<&Package> {
        self.table(api_version)?.get(channel, id)
    }

    /// Tables from the highest API version to the lowest
    pub fn iter_descending(&self) -> impl Iterator<Item = (&Version, &ChannelTable)> {
        self.tables.iter().rev()
    }

    /// Every translation language seen while the index was built
    pub fn languages(&self) -> &BTreeSet<String> {
        &self.languages
    }

    /// Number of (API version, channel, id) entries
    pub fn len(&self) -> usize {
        self.tables
            .values()
            .flat_map(|table| table.slots.values())
            .map(BTreeMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn slot_mut(&mut self, api_version: Version, channel: Channel) -> &mut ChannelSlot {
        self.tables
            .entry(api_version)
            .or_insert_with(ChannelTable::new)
            .slot_mut(channel)
    }

    pub(crate) fn add_languages<'a>(&mut self, languages: impl IntoIterator<Item = &'a String>) {
        for language in languages {
            if !self.languages.contains(language) {
                self.languages.insert(language.clone());
            }
        }
    }
}
