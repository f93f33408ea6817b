/// Flickr API endpoints. Overridable so the client can be pointed at a
/// local stand-in.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub rest: String,
    pub upload: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            rest: "https://api.flickr.com/services/rest/".to_string(),
            upload: "https://up.flickr.com/services/upload/".to_string(),
        }
    }
}
