//! Folds a record's facet values into a vocabulary.

use super::document::{Facet, FacetVocabulary};
use super::facet_set::MembershipMode;
use crate::record::SearchRecord;

/// Split a multi-valued field.
///
/// `/` wins over `,`: a value holding any `/` is split on `/` only, else a
/// value holding `,` is split on `,`, else the whole value is one token.
/// Tokens are trimmed; blank ones are dropped.
pub fn split_tokens(raw: &str) -> Vec<&str> {
    let pieces: Vec<&str> = if raw.contains('/') {
        raw.split('/').collect()
    } else if raw.contains(',') {
        raw.split(',').collect()
    } else {
        vec![raw]
    };
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Tokens appended by one merge, per facet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub appended: Vec<(Facet, String)>,
}

impl MergeOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.appended.is_empty()
    }

    pub fn count(&self, facet: Facet) -> usize {
        self.appended.iter().filter(|(f, _)| *f == facet).count()
    }
}

/// Merges [`SearchRecord`] facet values into a [`FacetVocabulary`].
///
/// Only `Category`, `Tag`, `Area` and `Language` grow from records; `Year`
/// and `Initial` keep whatever they were seeded with.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacetAggregator {
    mode: MembershipMode,
}

impl FacetAggregator {
    pub fn new(mode: MembershipMode) -> Self {
        Self { mode }
    }

    /// Return `vocabulary` with `record` merged in.
    pub fn merge(&self, mut vocabulary: FacetVocabulary, record: &SearchRecord) -> FacetVocabulary {
        self.merge_into(&mut vocabulary, record);
        vocabulary
    }

    /// Merge `record` into `vocabulary` in place.
    pub fn merge_into(&self, vocabulary: &mut FacetVocabulary, record: &SearchRecord) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        // Category names are single-valued; a slash in one is part of the name.
        self.append(vocabulary, Facet::Category, [record.category_name.as_str()], &mut outcome);
        self.append(vocabulary, Facet::Tag, split_tokens(&record.class_tag), &mut outcome);
        self.append(vocabulary, Facet::Area, split_tokens(&record.area), &mut outcome);
        self.append(vocabulary, Facet::Language, split_tokens(&record.language), &mut outcome);

        outcome
    }

    fn append<'a>(
        &self,
        vocabulary: &mut FacetVocabulary,
        facet: Facet,
        tokens: impl IntoIterator<Item = &'a str>,
        outcome: &mut MergeOutcome,
    ) {
        let set = vocabulary.facet_mut(facet);
        for token in tokens {
            for added in set.insert(token, self.mode) {
                outcome.appended.push((facet, added));
            }
        }
    }
}
