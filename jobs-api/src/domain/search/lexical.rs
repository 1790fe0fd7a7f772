//! Weighted lexical documents for job postings.
//!
//! A job's search document is derived only from its title, must-have skills,
//! nice-to-have skills and language. Title lexemes weigh the most, then
//! must-have skills, then nice-to-have skills. The analyzer is chosen by the
//! posting's language; a missing language uses English.

use std::collections::HashMap;
use std::sync::LazyLock;

use jobs_core::{JobRecord, Language};
use tantivy::tokenizer::{
    Language as StemLanguage, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer,
    StopWordFilter, TextAnalyzer, TokenStream,
};

/// Relevance tier of a lexeme, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weight {
    C,
    B,
    A,
}

impl Weight {
    /// Same tier values as PostgreSQL's default `ts_rank` weights.
    pub fn value(self) -> f32 {
        match self {
            Weight::A => 1.0,
            Weight::B => 0.4,
            Weight::C => 0.2,
        }
    }
}

/// Tokenizer, stopword and stemming pipeline for one language.
#[derive(Clone)]
pub struct Analyzer {
    inner: TextAnalyzer,
}

impl Analyzer {
    fn new(language: Language) -> Self {
        let stem_language = match language {
            Language::English => StemLanguage::English,
            Language::Spanish => StemLanguage::Spanish,
        };
        let stop_words = StopWordFilter::new(stem_language)
            .unwrap_or_else(|| StopWordFilter::remove(Vec::<String>::new()));

        let inner = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(RemoveLongFilter::limit(40))
            .filter(LowerCaser)
            .filter(stop_words)
            .filter(Stemmer::new(stem_language))
            .build();

        Self { inner }
    }

    pub fn for_language(language: Language) -> &'static Analyzer {
        match language {
            Language::English => &ENGLISH,
            Language::Spanish => &SPANISH,
        }
    }

    /// Lexemes of `text` in order of appearance. Stopwords produce nothing.
    pub fn lexemes(&self, text: &str) -> Vec<String> {
        let mut analyzer = self.inner.clone();
        let mut stream = analyzer.token_stream(text);
        let mut lexemes = Vec::new();
        while stream.advance() {
            lexemes.push(stream.token().text.clone());
        }
        lexemes
    }
}

static ENGLISH: LazyLock<Analyzer> = LazyLock::new(|| Analyzer::new(Language::English));
static SPANISH: LazyLock<Analyzer> = LazyLock::new(|| Analyzer::new(Language::Spanish));

/// Lexeme -> highest weight it appears with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchDocument {
    language: Language,
    lexemes: HashMap<String, Weight>,
}

impl SearchDocument {
    pub fn build(
        title: &str,
        must_have_skills: &[String],
        nice_to_have_skills: &[String],
        language: Option<Language>,
    ) -> Self {
        let language = language.unwrap_or_default();
        let analyzer = Analyzer::for_language(language);
        let mut document = Self {
            language,
            lexemes: HashMap::new(),
        };

        document.add(analyzer, title, Weight::A);
        for skill in must_have_skills {
            document.add(analyzer, skill, Weight::B);
        }
        for skill in nice_to_have_skills {
            document.add(analyzer, skill, Weight::C);
        }

        document
    }

    pub fn for_job(job: &JobRecord) -> Self {
        Self::build(
            &job.title,
            job.must_have_skills.as_deref().unwrap_or_default(),
            job.nice_to_have_skills.as_deref().unwrap_or_default(),
            job.language,
        )
    }

    fn add(&mut self, analyzer: &Analyzer, text: &str, weight: Weight) {
        for lexeme in analyzer.lexemes(text) {
            let entry = self.lexemes.entry(lexeme).or_insert(weight);
            if weight > *entry {
                *entry = weight;
            }
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn weight_of(&self, lexeme: &str) -> Option<Weight> {
        self.lexemes.get(lexeme).copied()
    }

    pub fn contains(&self, lexeme: &str) -> bool {
        self.lexemes.contains_key(lexeme)
    }

    pub fn is_empty(&self) -> bool {
        self.lexemes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn stem(language: Language, word: &str) -> String {
        Analyzer::for_language(language).lexemes(word).remove(0)
    }

    #[test]
    fn english_analyzer_stems_and_drops_stopwords() {
        let lexemes = Analyzer::for_language(Language::English).lexemes("The Engineers of Testing");
        assert_eq!(lexemes.len(), 2);
        assert_eq!(lexemes[0], stem(Language::English, "engineer"));
        assert_eq!(lexemes[1], "test");
    }

    #[test]
    fn stopwords_only_yields_nothing() {
        assert!(Analyzer::for_language(Language::English)
            .lexemes("the and of")
            .is_empty());
    }

    #[test]
    fn title_outranks_skills() {
        let doc = SearchDocument::build(
            "Rust Engineer",
            &skills(&["Rust", "PostgreSQL"]),
            &skills(&["Kubernetes"]),
            Some(Language::English),
        );
        assert_eq!(doc.weight_of("rust"), Some(Weight::A));
        assert_eq!(
            doc.weight_of(&stem(Language::English, "postgresql")),
            Some(Weight::B)
        );
        assert_eq!(
            doc.weight_of(&stem(Language::English, "kubernetes")),
            Some(Weight::C)
        );
        assert_eq!(doc.weight_of("java"), None);
    }

    #[test]
    fn missing_language_uses_english_analyzer() {
        let doc = SearchDocument::build("Developers", &[], &[], None);
        assert_eq!(doc.language(), Language::English);
        assert!(doc.contains(&stem(Language::English, "developer")));
    }

    #[test]
    fn spanish_documents_use_spanish_analyzer() {
        let doc = SearchDocument::build(
            "Desarrolladores de software",
            &[],
            &[],
            Some(Language::Spanish),
        );
        assert_eq!(doc.language(), Language::Spanish);
        assert!(!doc.contains("de"));
        assert!(doc.contains(&stem(Language::Spanish, "desarrolladores")));
    }

    #[test]
    fn document_is_a_pure_function_of_its_inputs() {
        let a = SearchDocument::build("Data Engineer", &skills(&["SQL"]), &[], None);
        let b = SearchDocument::build(
            "Data Engineer",
            &skills(&["SQL"]),
            &[],
            Some(Language::English),
        );
        assert_eq!(a, b);
    }
}
