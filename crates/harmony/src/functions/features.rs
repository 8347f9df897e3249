use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Switches that admit optional template variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Feature {
    Diatonic = 0,
    SixthChords,
    AddedTones,
    Suspended,
    PowerDyads,
    Extended,
    LydianExtensions,
    AlteredDominant,
    LeadingTone,
    RaisedSixth,
    ParallelMajor,
    ParallelMinor,
}

impl Feature {
    pub const ALL: [Feature; 12] = [
        Feature::Diatonic,
        Feature::SixthChords,
        Feature::AddedTones,
        Feature::Suspended,
        Feature::PowerDyads,
        Feature::Extended,
        Feature::LydianExtensions,
        Feature::AlteredDominant,
        Feature::LeadingTone,
        Feature::RaisedSixth,
        Feature::ParallelMajor,
        Feature::ParallelMinor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::Diatonic => "diatonic",
            Feature::SixthChords => "sixth_chords",
            Feature::AddedTones => "added_tones",
            Feature::Suspended => "suspended",
            Feature::PowerDyads => "power_dyads",
            Feature::Extended => "extended",
            Feature::LydianExtensions => "lydian_extensions",
            Feature::AlteredDominant => "altered_dominant",
            Feature::LeadingTone => "leading_tone",
            Feature::RaisedSixth => "raised_sixth",
            Feature::ParallelMajor => "parallel_major",
            Feature::ParallelMinor => "parallel_minor",
        }
    }

    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Feature::ALL
            .into_iter()
            .find(|feature| feature.as_str() == name)
            .ok_or_else(|| Error::UnknownFeature {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Feature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Set of [`Feature`]s, one bit each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FeatureSet(u16);

impl FeatureSet {
    pub const EMPTY: FeatureSet = FeatureSet(0);

    pub const fn of(features: &[Feature]) -> Self {
        let mut bits = 0u16;
        let mut i = 0;
        while i < features.len() {
            bits |= features[i].bit();
            i += 1;
        }
        Self(bits)
    }

    /// Parse feature names, rejecting any outside the closed set.
    pub fn from_names<I, S>(names: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().try_fold(Self::EMPTY, |set, name| {
            Ok(set.with(name.as_ref().parse()?))
        })
    }

    pub const fn with(self, feature: Feature) -> Self {
        Self(self.0 | feature.bit())
    }

    pub fn contains(self, feature: Feature) -> bool {
        self.0 & feature.bit() != 0
    }

    pub fn is_subset_of(self, other: FeatureSet) -> bool {
        self.0 & other.0 == self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Feature> {
        Feature::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, FeatureSet::with)
    }
}

pub const DEFAULT_FEATURES_MAJOR: FeatureSet = FeatureSet::of(&[
    Feature::Diatonic,
    Feature::SixthChords,
    Feature::AddedTones,
    Feature::Suspended,
    Feature::Extended,
]);

pub const DEFAULT_FEATURES_MINOR: FeatureSet = FeatureSet::of(&[
    Feature::Diatonic,
    Feature::AddedTones,
    Feature::Suspended,
    Feature::Extended,
    Feature::LeadingTone,
    Feature::ParallelMajor,
]);

/// Labels attached to generated functions. Feature names double as tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Feature(Feature),
    Borrowable,
    Borrowed,
    ModalMix,
    HarmonicMinor,
    MelodicMinor,
    Subtonic,
    Omit11,
    Avoid3Or11,
    Modal,
    ScaleFormDependent,
}

impl Tag {
    pub const DIATONIC: Tag = Tag::Feature(Feature::Diatonic);

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Feature(feature) => feature.as_str(),
            Tag::Borrowable => "borrowable",
            Tag::Borrowed => "borrowed",
            Tag::ModalMix => "modal_mix",
            Tag::HarmonicMinor => "harmonic_minor",
            Tag::MelodicMinor => "melodic_minor",
            Tag::Subtonic => "subtonic",
            Tag::Omit11 => "omit_11",
            Tag::Avoid3Or11 => "avoid_3_or_11",
            Tag::Modal => "modal",
            Tag::ScaleFormDependent => "scale_form_dependent",
        }
    }
}

// Tags sort by name so generated lists read alphabetically.
impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
