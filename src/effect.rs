//! Effects - side effects declared by the reducer

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch the type listing and the first `count` members
    LoadCategory {
        api_base: String,
        category: String,
        count: usize,
    },
    CancelLoad,
    LoadArtwork { name: String, url: String },
}
