use std::collections::HashSet;

use lazy_static::lazy_static;

lazy_static! {
    static ref ENGLISH: Stopwords = Stopwords::from_iter(ENGLISH_STOPWORDS.iter().copied());
}

#[rustfmt::skip]
const ENGLISH_STOPWORDS: &[&str] = &[
    "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
    "be","because","been","before","being","below","between","both","but","by",
    "can","can't","cannot","could","couldn't",
    "did","didn't","do","does","doesn't","doing","don't","down","during",
    "each","few","for","from","further",
    "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
    "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
    "let's","me","more","most","mustn't","my","myself",
    "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
    "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
    "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
    "under","until","up","very",
    "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
    "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
];

/// Set-membership test used by stopword removal.
pub trait StopwordSet: Send + Sync {
    fn is_stopword(&self, token: &str) -> bool;
}

/// A fixed list of stopwords, matched case-sensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// The built-in English list (lower-case).
    pub fn english() -> &'static Stopwords {
        &ENGLISH
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Stopwords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { words: iter.into_iter().map(Into::into).collect() }
    }
}

impl StopwordSet for Stopwords {
    fn is_stopword(&self, token: &str) -> bool {
        self.words.contains(token)
    }
}

impl<F> StopwordSet for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_stopword(&self, token: &str) -> bool {
        self(token)
    }
}
