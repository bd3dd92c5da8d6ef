//! Facet search endpoints
//!
//! Every facet dimension is served by the same kind of listing page, so a
//! single [`FacetSearchClient::search`] covers all of them. What differs per
//! facet is kept in one table, [`FacetKind::endpoint`].

use crate::codec::decode;
use crate::error::TransportResult;
use crate::transport::{Transport, TransportRequest};
use crate::types::SearchResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};

/// Facet dimensions the server can filter by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacetKind {
    Language,
    Label,
    Category,
    State,
    Packaging,
    Brand,
    PurchasePlace,
    Store,
    Country,
    Ingredient,
    Trace,
    PackagerCode,
    NutritionGrade,
    City,
    Additive,
}

/// Endpoint family a facet belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointShape {
    /// Tag listing, `<segment>/<value>.json`
    Tag,
    /// `by<Facet>` listing, `<segment>/<value>.json`
    By,
}

/// Where a facet is served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FacetEndpoint {
    /// First path segment
    pub segment: &'static str,
    /// Endpoint family
    pub shape: EndpointShape,
}

impl FacetEndpoint {
    const fn tag(segment: &'static str) -> Self {
        Self {
            segment,
            shape: EndpointShape::Tag,
        }
    }

    const fn by(segment: &'static str) -> Self {
        Self {
            segment,
            shape: EndpointShape::By,
        }
    }

    /// Path segments for a facet value
    ///
    /// The value is placed verbatim; percent-encoding happens in the
    /// transport.
    #[must_use]
    pub fn path(&self, value: &str) -> [String; 2] {
        [self.segment.to_string(), format!("{value}.json")]
    }
}

impl FacetKind {
    /// All facet kinds, in declaration order
    pub const ALL: [FacetKind; 15] = [
        Self::Language,
        Self::Label,
        Self::Category,
        Self::State,
        Self::Packaging,
        Self::Brand,
        Self::PurchasePlace,
        Self::Store,
        Self::Country,
        Self::Ingredient,
        Self::Trace,
        Self::PackagerCode,
        Self::NutritionGrade,
        Self::City,
        Self::Additive,
    ];

    /// Endpoint table
    #[must_use]
    pub const fn endpoint(self) -> FacetEndpoint {
        match self {
            Self::Language => FacetEndpoint::tag("language"),
            Self::Label => FacetEndpoint::tag("label"),
            Self::Category => FacetEndpoint::tag("category"),
            Self::State => FacetEndpoint::tag("state"),
            Self::Packaging => FacetEndpoint::tag("packaging"),
            Self::Brand => FacetEndpoint::tag("brand"),
            Self::PurchasePlace => FacetEndpoint::tag("purchase-place"),
            Self::Store => FacetEndpoint::tag("store"),
            Self::Ingredient => FacetEndpoint::tag("ingredient"),
            Self::Trace => FacetEndpoint::tag("trace"),
            Self::Country => FacetEndpoint::by("country"),
            Self::PackagerCode => FacetEndpoint::by("packager-code"),
            Self::NutritionGrade => FacetEndpoint::by("nutrition-grade"),
            Self::City => FacetEndpoint::by("city"),
            Self::Additive => FacetEndpoint::by("additive"),
        }
    }

    /// URL segment, also the canonical name
    #[must_use]
    pub const fn segment(self) -> &'static str {
        self.endpoint().segment
    }

    /// Endpoint family
    #[must_use]
    pub const fn shape(self) -> EndpointShape {
        self.endpoint().shape
    }
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// Unknown facet name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown facet kind: {0}")]
pub struct UnknownFacet(pub String);

impl FromStr for FacetKind {
    type Err = UnknownFacet;

    /// Accepts `purchase-place`, `purchase_place`, `purchasePlace` and friends
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        Self::ALL
            .into_iter()
            .find(|kind| kind.segment().replace('-', "") == key)
            .ok_or_else(|| UnknownFacet(s.to_string()))
    }
}

/// A facet search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetQuery {
    pub facet: FacetKind,
    /// Facet slug, e.g. `baby-foods`
    pub value: String,
    /// Fields to project; `None` keeps the server defaults
    pub extra_fields: Option<BTreeSet<String>>,
}

impl FacetQuery {
    /// Query one facet value with the server's default fields
    pub fn new(facet: FacetKind, value: impl Into<String>) -> Self {
        Self {
            facet,
            value: value.into(),
            extra_fields: None,
        }
    }

    /// Request these fields on every returned product
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_fields
            .get_or_insert_with(BTreeSet::new)
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// Comma-joined `fields` parameter, if any fields were requested
    #[must_use]
    pub fn fields_param(&self) -> Option<String> {
        join_fields(self.extra_fields.as_ref())
    }

    /// Transport request for this query
    #[must_use]
    pub fn to_request(&self) -> TransportRequest {
        let request = TransportRequest::get(self.facet.endpoint().path(&self.value));
        match self.fields_param() {
            Some(fields) => request.with_query("fields", fields),
            None => request,
        }
    }
}

/// Comma-join a field set; empty sets count as absent
pub(crate) fn join_fields(fields: Option<&BTreeSet<String>>) -> Option<String> {
    fields
        .filter(|f| !f.is_empty())
        .map(|f| f.iter().map(String::as_str).collect::<Vec<_>>().join(","))
}

/// Facet search API interface
#[derive(Clone)]
pub struct FacetSearchClient {
    transport: Arc<dyn Transport>,
}

impl FacetSearchClient {
    /// Create a facet search client over a transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Run a facet search
    ///
    /// GET /`<segment>`/`<value>`.json[?fields=...]
    ///
    /// Zero matches is an ordinary empty result.
    #[instrument(skip(self, query), fields(facet = %query.facet, value = %query.value))]
    pub async fn search(&self, query: &FacetQuery) -> TransportResult<SearchResult> {
        let start = Instant::now();
        let body = self.transport.execute(query.to_request()).await?;
        let result: SearchResult = decode(&body)?;

        debug!(
            count = result.count,
            returned = result.products.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Facet search completed"
        );
        Ok(result)
    }

    /// Shorthand for [`search`](Self::search) with default fields
    pub async fn by(&self, facet: FacetKind, value: &str) -> TransportResult<SearchResult> {
        self.search(&FacetQuery::new(facet, value)).await
    }
}
