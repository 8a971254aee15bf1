//! The per-partition vocabulary document and its hash encoding.

use std::collections::HashMap;

use chrono::{Datelike, Local};

use super::facet_set::FacetSet;

/// A filterable attribute of the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Category,
    Tag,
    Area,
    Language,
    Year,
    Initial,
}

impl Facet {
    pub const ALL: [Facet; 6] = [
        Facet::Category,
        Facet::Tag,
        Facet::Area,
        Facet::Language,
        Facet::Year,
        Facet::Initial,
    ];

    /// Hash field holding this facet.
    pub fn field_name(self) -> &'static str {
        match self {
            Facet::Category => "Category",
            Facet::Tag => "Tag",
            Facet::Area => "Area",
            Facet::Language => "Language",
            Facet::Year => "Year",
            Facet::Initial => "Initial",
        }
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.field_name())
    }
}

/// Hash field holding the sort options.
pub const SORT_FIELD: &str = "Sort";

/// Facet vocabularies of one parent-category partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetVocabulary {
    pub category: FacetSet,
    pub tag: FacetSet,
    pub area: FacetSet,
    pub language: FacetSet,
    pub year: FacetSet,
    pub initial: FacetSet,
    pub sort_options: Vec<String>,
}

impl FacetVocabulary {
    /// A fresh vocabulary seeded from the local calendar year.
    pub fn seeded(year_span: u32, sort_options: &[String]) -> Self {
        Self::seeded_for_year(Local::now().year(), year_span, sort_options)
    }

    /// A fresh vocabulary: `year` holds `current_year` and the `year_span - 1`
    /// years before it, newest first; `initial` holds `A` through `Z`; the
    /// other facets are empty.
    ///
    /// The span stops at year 1.
    pub fn seeded_for_year(current_year: i32, year_span: u32, sort_options: &[String]) -> Self {
        let span = i32::try_from(year_span).unwrap_or(i32::MAX).min(current_year.max(0));
        let years = (0..span).map(|back| (current_year - back).to_string());
        let initials = ('A'..='Z').map(String::from);

        Self {
            category: FacetSet::new(),
            tag: FacetSet::new(),
            area: FacetSet::new(),
            language: FacetSet::new(),
            year: FacetSet::from_tokens(years),
            initial: FacetSet::from_tokens(initials),
            sort_options: sort_options.to_vec(),
        }
    }

    /// Decode a stored hash.
    ///
    /// Returns `None` when the `Year` field is missing or blank: such a
    /// document was never seeded and is replaced wholesale.
    pub fn from_hash(hash: &HashMap<String, String>) -> Option<Self> {
        let field = |facet: Facet| {
            FacetSet::parse(hash.get(facet.field_name()).map(String::as_str).unwrap_or(""))
        };

        let year = field(Facet::Year);
        if year.is_empty() {
            return None;
        }

        let sort_options = hash
            .get(SORT_FIELD)
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            category: field(Facet::Category),
            tag: field(Facet::Tag),
            area: field(Facet::Area),
            language: field(Facet::Language),
            year,
            initial: field(Facet::Initial),
            sort_options,
        })
    }

    /// Encode every field for `HMSET`.
    pub fn to_hash(&self) -> Vec<(String, String)> {
        let mut fields: Vec<(String, String)> = Facet::ALL
            .iter()
            .map(|&facet| (facet.field_name().to_string(), self.facet(facet).flatten().to_string()))
            .collect();
        fields.push((SORT_FIELD.to_string(), self.sort_options.join(",")));
        fields
    }

    pub fn facet(&self, facet: Facet) -> &FacetSet {
        match facet {
            Facet::Category => &self.category,
            Facet::Tag => &self.tag,
            Facet::Area => &self.area,
            Facet::Language => &self.language,
            Facet::Year => &self.year,
            Facet::Initial => &self.initial,
        }
    }

    pub fn facet_mut(&mut self, facet: Facet) -> &mut FacetSet {
        match facet {
            Facet::Category => &mut self.category,
            Facet::Tag => &mut self.tag,
            Facet::Area => &mut self.area,
            Facet::Language => &mut self.language,
            Facet::Year => &mut self.year,
            Facet::Initial => &mut self.initial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sort() -> Vec<String> {
        vec!["Time".to_string(), "Db".to_string(), "Score".to_string()]
    }

    #[test]
    fn test_seed_years_and_initials() {
        let vocab = FacetVocabulary::seeded_for_year(2026, 12, &sort());

        assert_eq!(vocab.year.len(), 12);
        assert_eq!(vocab.year.tokens().first().map(String::as_str), Some("2026"));
        assert_eq!(vocab.year.tokens().last().map(String::as_str), Some("2015"));
        assert_eq!(
            vocab.year.flatten(),
            "2026,2025,2024,2023,2022,2021,2020,2019,2018,2017,2016,2015"
        );
        assert_eq!(vocab.initial.len(), 26);
        assert_eq!(vocab.initial.flatten(), "A,B,C,D,E,F,G,H,I,J,K,L,M,N,O,P,Q,R,S,T,U,V,W,X,Y,Z");
        assert!(vocab.category.is_empty());
        assert!(vocab.tag.is_empty());
        assert!(vocab.area.is_empty());
        assert!(vocab.language.is_empty());
        assert_eq!(vocab.sort_options, sort());
    }

    #[test]
    fn test_seed_span_stops_at_year_one() {
        let vocab = FacetVocabulary::seeded_for_year(5, u32::MAX, &[]);
        assert_eq!(vocab.year.flatten(), "5,4,3,2,1");

        let vocab = FacetVocabulary::seeded_for_year(2026, 0, &[]);
        assert!(vocab.year.is_empty());
    }

    #[test]
    fn test_seeded_uses_current_year() {
        let vocab = FacetVocabulary::seeded(12, &sort());
        let this_year = Local::now().year().to_string();
        assert_eq!(vocab.year.tokens()[0], this_year);
    }

    #[test]
    fn test_hash_encoding() {
        let mut vocab = FacetVocabulary::seeded_for_year(2026, 2, &sort());
        vocab.area = FacetSet::parse("USA,Canada");

        let hash: HashMap<String, String> = vocab.to_hash().into_iter().collect();
        assert_eq!(hash.len(), 7);
        assert_eq!(hash["Year"], "2026,2025");
        assert_eq!(hash["Area"], "USA,Canada");
        assert_eq!(hash["Category"], "");
        assert_eq!(hash["Sort"], "Time,Db,Score");

        assert_eq!(FacetVocabulary::from_hash(&hash), Some(vocab));
    }

    #[test]
    fn test_unseeded_hash_is_absent() {
        assert_eq!(FacetVocabulary::from_hash(&HashMap::new()), None);

        let mut hash = HashMap::new();
        hash.insert("Area".to_string(), "USA".to_string());
        hash.insert("Year".to_string(), String::new());
        assert_eq!(FacetVocabulary::from_hash(&hash), None);
    }

    #[test]
    fn test_missing_fields_decode_empty() {
        let mut hash = HashMap::new();
        hash.insert("Year".to_string(), "1999".to_string());

        let vocab = FacetVocabulary::from_hash(&hash).unwrap();
        assert_eq!(vocab.year.flatten(), "1999");
        assert!(vocab.initial.is_empty());
        assert!(vocab.sort_options.is_empty());
    }

    #[test]
    fn test_facet_accessors_line_up_with_fields() {
        let mut vocab = FacetVocabulary::seeded_for_year(2000, 1, &[]);
        vocab.facet_mut(Facet::Tag).insert("Noir", crate::vocabulary::MembershipMode::Exact);
        assert_eq!(vocab.tag.flatten(), "Noir");
        assert_eq!(vocab.facet(Facet::Year).flatten(), "2000");
        assert_eq!(Facet::Language.to_string(), "Language");
    }
}
