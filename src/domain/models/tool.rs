#[cfg(test)]
#[path = "tool_test.rs"]
mod tests;

/// Backend features reachable through the authenticated gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Tool {
    ColorizeLineart,
    CreativeWorkshop,
    PortraitWorkshop,
    AskQuestion,
    GenerateIdeas,
    MoodPainting,
    CritiqueHomework,
    #[strum(serialize = "gallery/explain")]
    GalleryExplain,
}

impl Tool {
    pub fn endpoint(&self) -> String {
        return format!("/api/{self}");
    }
}
