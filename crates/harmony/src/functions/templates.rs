//! Functional templates for major and minor keys.
//!
//! Each template anchors a list of variants at a degree (semitones above
//! the tonic). Variant order is significant: the generator emits them in
//! table order.

use super::features::{Feature, FeatureSet, Tag};
use super::Role;
use Feature as F;
use Role::{Dominant, Predominant, Tonic, TonicProlongation};

pub struct FunctionVariant {
    pub quality: &'static str,
    pub modal_label: &'static str,
    pub role: Role,
    /// Declared against the parent scale. The generator re-checks by mask.
    pub diatonic: bool,
    pub requires: FeatureSet,
    pub extra_tags: &'static [Tag],
}

impl FunctionVariant {
    const fn new(
        quality: &'static str,
        modal_label: &'static str,
        role: Role,
        diatonic: bool,
        requires: &[Feature],
        extra_tags: &'static [Tag],
    ) -> Self {
        Self {
            quality,
            modal_label,
            role,
            diatonic,
            requires: FeatureSet::of(requires),
            extra_tags,
        }
    }

    /// Extra tags plus `diatonic` or `borrowable`, sorted and deduplicated.
    pub fn tags(&self) -> Vec<Tag> {
        let marker = if self.diatonic { Tag::DIATONIC } else { Tag::Borrowable };
        let mut tags: Vec<Tag> = self.extra_tags.iter().copied().chain([marker]).collect();
        tags.sort();
        tags.dedup();
        tags
    }
}

pub struct FunctionTemplate {
    pub degree: u8,
    pub variants: &'static [FunctionVariant],
}

const SIXTH: Tag = Tag::Feature(F::SixthChords);
const ADDED: Tag = Tag::Feature(F::AddedTones);
const SUS: Tag = Tag::Feature(F::Suspended);
const POWER: Tag = Tag::Feature(F::PowerDyads);
const EXT: Tag = Tag::Feature(F::Extended);
const LYDIAN: Tag = Tag::Feature(F::LydianExtensions);
const ALTERED: Tag = Tag::Feature(F::AlteredDominant);
const LEADING: Tag = Tag::Feature(F::LeadingTone);
const RAISED: Tag = Tag::Feature(F::RaisedSixth);
const PAR_MAJ: Tag = Tag::Feature(F::ParallelMajor);

const fn d(
    quality: &'static str,
    label: &'static str,
    role: Role,
    requires: &[Feature],
    tags: &'static [Tag],
) -> FunctionVariant {
    FunctionVariant::new(quality, label, role, true, requires, tags)
}

const fn nd(
    quality: &'static str,
    label: &'static str,
    role: Role,
    requires: &[Feature],
    tags: &'static [Tag],
) -> FunctionVariant {
    FunctionVariant::new(quality, label, role, false, requires, tags)
}

pub static TEMPLATES_MAJOR: &[FunctionTemplate] = &[
    FunctionTemplate {
        degree: 0,
        variants: &[
            d("maj", "I", Tonic, &[], &[]),
            d("maj6", "I6", Tonic, &[F::SixthChords], &[SIXTH]),
            d("majadd9", "Iadd9", Tonic, &[F::AddedTones], &[ADDED]),
            d("maj6add9", "I6add9", Tonic, &[F::SixthChords, F::AddedTones], &[SIXTH, ADDED]),
            d("maj7", "Imaj7", Tonic, &[], &[EXT]),
            d("maj9", "Imaj9", Tonic, &[], &[EXT]),
            d("maj13", "Imaj13", Tonic, &[], &[EXT]),
            nd("maj7#11", "Imaj7#11", Tonic, &[F::LydianExtensions], &[LYDIAN, EXT]),
            d("power", "I5", Tonic, &[F::PowerDyads], &[POWER]),
        ],
    },
    FunctionTemplate {
        degree: 2,
        variants: &[
            d("min", "ii", Predominant, &[], &[]),
            d("min7", "ii7", Predominant, &[], &[]),
            d("min9", "ii9", Predominant, &[], &[EXT]),
            d("min11", "ii11", Predominant, &[], &[EXT]),
            d("min13", "ii13", Predominant, &[], &[EXT]),
        ],
    },
    FunctionTemplate {
        degree: 4,
        variants: &[
            d("min", "iii", TonicProlongation, &[], &[]),
            d("min7", "iii7", TonicProlongation, &[], &[]),
            nd("min9", "iii9", TonicProlongation, &[F::LydianExtensions], &[LYDIAN, EXT]),
        ],
    },
    FunctionTemplate {
        degree: 5,
        variants: &[
            d("maj", "IV", Predominant, &[], &[]),
            d("maj6", "IV6", Predominant, &[F::SixthChords], &[SIXTH]),
            d("majadd9", "IVadd9", Predominant, &[F::AddedTones], &[ADDED]),
            d("maj6add9", "IV6add9", Predominant, &[F::SixthChords, F::AddedTones], &[SIXTH, ADDED]),
            d("sus2", "IVsus2", Predominant, &[F::Suspended], &[SUS, Tag::ModalMix]),
            d("sus4", "IVsus4", Predominant, &[F::Suspended], &[SUS]),
            d("maj7", "IVmaj7", Predominant, &[], &[EXT]),
            d("maj9", "IVmaj9", Predominant, &[], &[EXT]),
            nd("maj7#11", "IVmaj7#11", Predominant, &[F::LydianExtensions], &[LYDIAN, EXT]),
            nd("maj9#11", "IVmaj9#11", Predominant, &[F::LydianExtensions], &[LYDIAN, EXT]),
        ],
    },
    FunctionTemplate {
        degree: 7,
        variants: &[
            d("maj", "V", Dominant, &[], &[]),
            d("7", "V7", Dominant, &[], &[]),
            d("7sus4", "V7sus4", Dominant, &[F::Suspended], &[SUS]),
            d("9", "V9", Dominant, &[], &[EXT]),
            d("11", "V11", Dominant, &[], &[EXT, Tag::Avoid3Or11]),
            d("13", "V13", Dominant, &[], &[EXT, Tag::Omit11]),
            nd("7b5", "V7b5", Dominant, &[F::AlteredDominant], &[ALTERED]),
            nd("7#5", "V7#5", Dominant, &[F::AlteredDominant], &[ALTERED]),
            nd("7b9", "V7b9", Dominant, &[F::AlteredDominant], &[ALTERED]),
            nd("7#9", "V7#9", Dominant, &[F::AlteredDominant], &[ALTERED]),
            nd("7#11", "V7#11", Dominant, &[F::LydianExtensions], &[LYDIAN, EXT]),
            nd("9b5", "V9b5", Dominant, &[F::AlteredDominant], &[ALTERED, EXT]),
            nd("9#5", "V9#5", Dominant, &[F::AlteredDominant], &[ALTERED, EXT]),
            nd("7alt", "Valt", Dominant, &[F::AlteredDominant], &[ALTERED]),
        ],
    },
    FunctionTemplate {
        degree: 9,
        variants: &[
            d("min", "vi", Tonic, &[], &[]),
            d("min7", "vi7", Tonic, &[], &[]),
            d("minadd9", "viadd9", Tonic, &[F::AddedTones], &[ADDED]),
            d("min9", "vi9", Tonic, &[], &[EXT]),
            d("min11", "vi11", Tonic, &[], &[EXT]),
            nd("min6", "vi6", Tonic, &[F::LydianExtensions], &[SIXTH, LYDIAN]),
            nd("min13", "vi13", Tonic, &[F::LydianExtensions], &[LYDIAN, EXT]),
        ],
    },
    FunctionTemplate {
        degree: 11,
        variants: &[
            d("dim", "viidim", Dominant, &[], &[]),
            d("min7b5", "viiø7", Dominant, &[], &[]),
            nd("dim7", "viidim7", Dominant, &[F::LeadingTone], &[LEADING]),
        ],
    },
];

pub static TEMPLATES_MINOR: &[FunctionTemplate] = &[
    FunctionTemplate {
        degree: 0,
        variants: &[
            d("min", "i", Tonic, &[], &[]),
            d("minadd9", "iadd9", Tonic, &[F::AddedTones], &[ADDED]),
            nd("min6", "i6", Tonic, &[F::RaisedSixth], &[SIXTH, RAISED, Tag::MelodicMinor]),
            nd(
                "min6add9",
                "i6add9",
                Tonic,
                &[F::RaisedSixth, F::AddedTones],
                &[SIXTH, ADDED, RAISED, Tag::MelodicMinor],
            ),
            d("min7", "i7", Tonic, &[], &[]),
            d("min9", "i9", Tonic, &[], &[EXT, Tag::ScaleFormDependent]),
            d("min11", "i11", Tonic, &[], &[EXT, Tag::ScaleFormDependent]),
            nd("min13", "i13", Tonic, &[F::RaisedSixth], &[RAISED, EXT, Tag::MelodicMinor]),
            nd("minmaj7", "imaj7", Tonic, &[F::LeadingTone], &[LEADING, Tag::HarmonicMinor]),
            d("power", "i5", Tonic, &[F::PowerDyads], &[POWER]),
        ],
    },
    FunctionTemplate {
        degree: 2,
        variants: &[
            d("dim", "iidim", Predominant, &[], &[]),
            d("min7b5", "iiø7", Predominant, &[], &[]),
            nd("dim7", "iidim7", Predominant, &[F::LeadingTone], &[LEADING, Tag::HarmonicMinor]),
        ],
    },
    FunctionTemplate {
        degree: 3,
        variants: &[
            d("maj", "bIII", Tonic, &[], &[]),
            d("majadd9", "bIIIadd9", Tonic, &[F::AddedTones], &[ADDED]),
            d("maj6", "bIII6", Tonic, &[F::SixthChords], &[SIXTH]),
            d("maj7", "bIIImaj7", Tonic, &[], &[EXT]),
            d("maj9", "bIIImaj9", Tonic, &[F::AddedTones], &[EXT, ADDED]),
        ],
    },
    FunctionTemplate {
        degree: 5,
        variants: &[
            d("min", "iv", Predominant, &[], &[]),
            d("minadd9", "ivadd9", Predominant, &[F::AddedTones], &[ADDED, Tag::MelodicMinor]),
            d("min6", "iv6", Predominant, &[F::SixthChords], &[SIXTH, Tag::Modal]),
            d("min7", "iv7", Predominant, &[], &[]),
            d("min9", "iv9", Predominant, &[], &[EXT, Tag::ScaleFormDependent]),
            d("min11", "iv11", Predominant, &[], &[EXT, Tag::ScaleFormDependent]),
            d("min13", "iv13", Predominant, &[], &[EXT, Tag::ScaleFormDependent]),
        ],
    },
    FunctionTemplate {
        degree: 7,
        variants: &[
            d("min", "v", Dominant, &[], &[Tag::Modal]),
            d("min7", "v7", Dominant, &[], &[Tag::Modal]),
            nd("7", "V7", Dominant, &[F::LeadingTone], &[LEADING, Tag::HarmonicMinor]),
            nd("9", "V9", Dominant, &[F::LeadingTone, F::RaisedSixth], DOMINANT_EXTENSION_TAGS),
            nd("11", "V11", Dominant, &[F::LeadingTone, F::RaisedSixth], DOMINANT_EXTENSION_TAGS),
            nd("13", "V13", Dominant, &[F::LeadingTone, F::RaisedSixth], DOMINANT_EXTENSION_TAGS),
            nd("7b9", "V7b9", Dominant, &[F::AlteredDominant, F::LeadingTone], ALTERED_LEADING_TAGS),
            nd("7#9", "V7#9", Dominant, &[F::AlteredDominant, F::LeadingTone], ALTERED_LEADING_TAGS),
            nd("7alt", "Valt", Dominant, &[F::AlteredDominant, F::LeadingTone], ALTERED_LEADING_TAGS),
        ],
    },
    FunctionTemplate {
        degree: 8,
        variants: &[
            d("maj", "bVI", Predominant, &[], &[]),
            d("majadd9", "bVIadd9", Predominant, &[F::AddedTones], &[ADDED]),
            d("maj6", "bVI6", Predominant, &[F::SixthChords], &[SIXTH]),
            d("maj7", "bVImaj7", Predominant, &[], &[EXT]),
            d("maj9", "bVImaj9", Predominant, &[F::AddedTones], &[EXT, ADDED]),
        ],
    },
    FunctionTemplate {
        degree: 10,
        variants: &[
            nd("maj", "bVII", Dominant, &[F::ParallelMajor], &[PAR_MAJ, Tag::Subtonic]),
            nd("majadd9", "bVIIadd9", Dominant, &[F::AddedTones], &[ADDED, PAR_MAJ, Tag::Subtonic]),
            nd("7sus4", "bVII7sus4", Dominant, &[F::Suspended], &[SUS, PAR_MAJ, Tag::Subtonic]),
            nd("7", "bVII7", Dominant, &[F::ParallelMajor], &[PAR_MAJ, Tag::Subtonic]),
            nd("9", "bVII9", Dominant, &[F::ParallelMajor], &[EXT, PAR_MAJ, Tag::Subtonic]),
            nd("13", "bVII13", Dominant, &[F::ParallelMajor], &[EXT, PAR_MAJ, Tag::Subtonic]),
        ],
    },
    FunctionTemplate {
        degree: 11,
        variants: &[
            nd("dim", "viidim", Dominant, &[F::LeadingTone], &[LEADING, Tag::HarmonicMinor]),
            nd("min7b5", "viiø7", Dominant, &[F::LeadingTone], &[LEADING, Tag::HarmonicMinor]),
            nd("dim7", "viidim7", Dominant, &[F::LeadingTone], &[LEADING, Tag::HarmonicMinor]),
        ],
    },
];

const DOMINANT_EXTENSION_TAGS: &[Tag] = &[
    LEADING,
    RAISED,
    EXT,
    Tag::HarmonicMinor,
    Tag::MelodicMinor,
];

const ALTERED_LEADING_TAGS: &[Tag] = &[ALTERED, LEADING, Tag::HarmonicMinor];
