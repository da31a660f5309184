use crate::basic_models::Category;

/// Tri-state fit filter. The UI encodes it as `''`, `true` or `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitFilter {
    #[default]
    Any,
    Fit,
    NotFit,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid fit filter {0:?}, expected '', 'true' or 'false'")]
pub struct ParseFitFilterError(String);

impl FitFilter {
    /// The value of the `fit` query parameter, if any.
    pub fn as_param(&self) -> Option<bool> {
        match self {
            FitFilter::Any => None,
            FitFilter::Fit => Some(true),
            FitFilter::NotFit => Some(false),
        }
    }

    pub fn as_ui(&self) -> &'static str {
        match self {
            FitFilter::Any => "",
            FitFilter::Fit => "true",
            FitFilter::NotFit => "false",
        }
    }
}

impl From<Option<bool>> for FitFilter {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => FitFilter::Any,
            Some(true) => FitFilter::Fit,
            Some(false) => FitFilter::NotFit,
        }
    }
}

impl std::str::FromStr for FitFilter {
    type Err = ParseFitFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(FitFilter::Any),
            "true" => Ok(FitFilter::Fit),
            "false" => Ok(FitFilter::NotFit),
            other => Err(ParseFitFilterError(other.to_string())),
        }
    }
}

/// The filters shown in the sidebar of the list page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeFilters {
    pub category: Option<Category>,
    pub fit: FitFilter,
    pub search: String,
}

impl RecipeFilters {
    pub fn is_active(&self) -> bool {
        self.category.is_some() || self.fit != FitFilter::Any || !self.search.trim().is_empty()
    }

    /// Whether switching from `self` to `other` changes category or fit.
    /// Search text alone never counts, it is applied on an explicit search.
    pub fn selection_changed(&self, other: &RecipeFilters) -> bool {
        self.category != other.category || self.fit != other.fit
    }
}

/// Everything needed to request one page of recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub categories: Vec<Category>,
    pub fit: Option<bool>,
    pub search: Option<String>,
    pub page: u32,
    pub size: u32,
}

impl ListQuery {
    pub fn from_filters(filters: &RecipeFilters, page: u32, size: u32) -> Self {
        let search = filters.search.trim();
        Self {
            categories: filters.category.into_iter().collect(),
            fit: filters.fit.as_param(),
            search: (!search.is_empty()).then(|| search.to_string()),
            page,
            size,
        }
    }

    /// Query string pairs, with `categories` repeated once per category.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = self
            .categories
            .iter()
            .map(|c| ("categories", c.to_string()))
            .collect();
        if let Some(fit) = self.fit {
            pairs.push(("fit", fit.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("size", self.size.to_string()));
        pairs
    }
}
