use crate::charts::{self, ChartKind};
use crate::data::Dataset;
use crate::error::{ChartError, Result};
use crate::ir::Figure;
use crate::RenderOptions;
use tracing::{debug, warn};

/// Numeric attributes of the song dataset that charts may be drawn from.
pub const SPOTIFY_ATTRIBUTES: [&str; 18] = [
    "artistcount",
    "releasedyear",
    "releasedmonth",
    "releasedday",
    "inspotifyplaylists",
    "inspotifycharts",
    "streams",
    "inappleplaylists",
    "inapplecharts",
    "indeezercharts",
    "bpm",
    "danceability",
    "valence",
    "energy",
    "acousticness",
    "instrumentalness",
    "liveness",
    "speechiness",
];

/// One attribute, or an x/y pair. x and y may name the same column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    Single(String),
    Pair { x: String, y: String },
}

impl AttributeSelector {
    pub fn single(name: impl Into<String>) -> Self {
        AttributeSelector::Single(name.into())
    }

    pub fn pair(x: impl Into<String>, y: impl Into<String>) -> Self {
        AttributeSelector::Pair {
            x: x.into(),
            y: y.into(),
        }
    }

    /// Number of attributes selected (1 or 2)
    pub fn arity(&self) -> usize {
        match self {
            AttributeSelector::Single(_) => 1,
            AttributeSelector::Pair { .. } => 2,
        }
    }

    /// Selected names in declared order (x before y).
    pub fn names(&self) -> Vec<&str> {
        match self {
            AttributeSelector::Single(a) => vec![a.as_str()],
            AttributeSelector::Pair { x, y } => vec![x.as_str(), y.as_str()],
        }
    }
}

/// A chart kind together with the attributes to draw it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub selector: AttributeSelector,
}

impl ChartRequest {
    pub fn new(kind: ChartKind, selector: AttributeSelector) -> Self {
        Self { kind, selector }
    }
}

/// Routes chart requests to the matching strategy.
///
/// Holds only a shared borrow of the dataset and immutable settings, so a
/// single dispatcher can serve any number of requests, from any thread.
#[derive(Debug, Clone)]
pub struct ChartDispatcher<'a> {
    dataset: &'a Dataset,
    options: RenderOptions,
    allow_list: Option<Vec<String>>,
}

impl<'a> ChartDispatcher<'a> {
    /// Dispatcher restricted to [`SPOTIFY_ATTRIBUTES`].
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            options: RenderOptions::default(),
            allow_list: Some(SPOTIFY_ATTRIBUTES.iter().map(|s| s.to_string()).collect()),
        }
    }

    /// Dispatcher accepting any column of the dataset.
    pub fn unrestricted(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            options: RenderOptions::default(),
            allow_list: None,
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_allow_list<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_list = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn dataset(&self) -> &Dataset {
        self.dataset
    }

    /// Attributes that can currently be charted: allow-listed names present
    /// in the dataset, or every column when unrestricted.
    pub fn available_attributes(&self) -> Vec<String> {
        match &self.allow_list {
            Some(list) => list
                .iter()
                .filter(|name| self.dataset.has_column(name))
                .cloned()
                .collect(),
            None => self.dataset.headers().to_vec(),
        }
    }

    /// Render the chart named by `kind` from the selected attributes.
    pub fn dispatch(&self, kind: &str, selector: &AttributeSelector) -> Result<Figure> {
        let kind = kind.parse::<ChartKind>().inspect_err(|e| {
            warn!(error = %e, "rejected chart request");
        })?;
        self.dispatch_request(&ChartRequest::new(kind, selector.clone()))
    }

    pub fn dispatch_request(&self, request: &ChartRequest) -> Result<Figure> {
        debug!(
            kind = %request.kind,
            attributes = ?request.selector.names(),
            "dispatching chart request"
        );
        self.validate(request)
            .and_then(|()| {
                charts::render(request.kind, self.dataset, &request.selector, &self.options)
            })
            .inspect_err(|e| {
                warn!(kind = %request.kind, error = %e, "rejected chart request");
            })
    }

    fn validate(&self, request: &ChartRequest) -> Result<()> {
        let expected = request.kind.arity();
        let found = request.selector.arity();
        if expected != found {
            return Err(ChartError::AttributeArity {
                kind: request.kind.name().to_string(),
                expected,
                found,
            });
        }

        for name in request.selector.names() {
            self.validate_attribute(name)?;
        }
        Ok(())
    }

    fn validate_attribute(&self, name: &str) -> Result<()> {
        let allowed = match &self.allow_list {
            Some(list) => list.iter().any(|a| a.eq_ignore_ascii_case(name.trim())),
            None => true,
        };
        if !allowed || !self.dataset.has_column(name) {
            return Err(ChartError::UnknownAttribute(name.trim().to_string()));
        }
        Ok(())
    }
}
