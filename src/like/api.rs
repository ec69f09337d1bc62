use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct RawLikeCount {
    pub like_count: u32,
}
