//! GraphQL search query construction
//!
//! Weaviate's read path is GraphQL. `SearchQuery` captures the search
//! parameters and renders the `Get` query the store expects, using hybrid
//! ranking when hybrid properties are present and near-text ranking (with
//! optional move-toward/move-away concepts) otherwise.

/// Parameters for a vector search against a Weaviate class
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Class to search
    pub class_name: String,

    /// Concept text to search for
    pub concepts: String,

    /// Fields to return for each hit
    pub fields: Vec<String>,

    /// Properties for hybrid ranking, with optional boost suffixes
    /// such as `title^5`
    pub hybrid_properties: Option<Vec<String>>,

    /// Maximum number of results
    pub limit: usize,

    /// Concepts to move the search towards
    pub move_to: Option<Vec<String>>,

    /// Concepts to move the search away from
    pub move_away_from: Option<Vec<String>>,

    /// Force applied when moving towards or away from concepts
    pub force: f64,
}

impl SearchQuery {
    /// Create a query with default parameters (limit 1, force 0.5)
    pub fn new(class_name: impl Into<String>, concepts: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            concepts: concepts.into(),
            fields: vec![
                "title".to_string(),
                "content".to_string(),
                "url".to_string(),
            ],
            hybrid_properties: None,
            limit: 1,
            move_to: None,
            move_away_from: None,
            force: 0.5,
        }
    }

    /// Set the fields to return
    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    /// Enable hybrid ranking over the given properties
    pub fn hybrid_properties(mut self, properties: Vec<String>) -> Self {
        self.hybrid_properties = Some(properties);
        self
    }

    /// Set the maximum number of results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Move the search towards the given concepts
    pub fn move_to(mut self, concepts: Vec<String>) -> Self {
        self.move_to = Some(concepts);
        self
    }

    /// Move the search away from the given concepts
    pub fn move_away_from(mut self, concepts: Vec<String>) -> Self {
        self.move_away_from = Some(concepts);
        self
    }

    /// Set the move force
    pub fn force(mut self, force: f64) -> Self {
        self.force = force;
        self
    }

    /// Render the GraphQL `Get` query
    pub(crate) fn to_graphql(&self) -> String {
        let mut args = vec![format!("limit: {}", self.limit)];

        match &self.hybrid_properties {
            Some(properties) => {
                args.push(format!(
                    "hybrid: {{query: {}, properties: [{}]}}",
                    quote(&self.concepts),
                    quote_list(properties),
                ));
            }
            None => {
                let mut near_text = format!("concepts: [{}]", quote(&self.concepts));

                if let Some(move_to) = &self.move_to {
                    near_text.push_str(&format!(
                        ", moveTo: {{concepts: [{}], force: {}}}",
                        quote_list(move_to),
                        self.force,
                    ));
                }

                if let Some(move_away) = &self.move_away_from {
                    near_text.push_str(&format!(
                        ", moveAwayFrom: {{concepts: [{}], force: {}}}",
                        quote_list(move_away),
                        self.force,
                    ));
                }

                args.push(format!("nearText: {{{}}}", near_text));
            }
        }

        format!(
            "{{ Get {{ {}({}) {{ {} }} }} }}",
            self.class_name,
            args.join(", "),
            self.fields.join(" "),
        )
    }
}

/// Quote a string as a GraphQL string literal
fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn quote_list(items: &[String]) -> String {
    items.iter().map(|s| quote(s)).collect::<Vec<_>>().join(", ")
}
