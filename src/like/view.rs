//! Rendering of the like control.

use super::{client::Source, state::LikeState};

/// Heart icon shown on the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    /// Outline heart, shown before liking.
    Heart,
    /// Filled heart, shown once liked.
    HeartFilled,
}

impl Icon {
    /// Inline SVG markup for the icon. Colors follow `currentColor`.
    #[must_use]
    pub fn svg(self) -> &'static str {
        match self {
            Self::Heart => concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="22" height="22" viewBox="0 0 24 24" stroke-width="2" stroke="currentColor" fill="none" stroke-linecap="round" stroke-linejoin="round">"#,
                r#"<path stroke="none" d="M0 0h24v24H0z" fill="none"/>"#,
                r#"<path d="M19.5 12.572l-7.5 7.428l-7.5 -7.428a5 5 0 1 1 7.5 -6.566a5 5 0 1 1 7.5 6.572"/>"#,
                "</svg>"
            ),
            Self::HeartFilled => concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="22" height="22" viewBox="0 0 24 24" stroke-width="2" stroke="currentColor" fill="none" stroke-linecap="round" stroke-linejoin="round">"#,
                r#"<path stroke="none" d="M0 0h24v24H0z" fill="none"/>"#,
                r#"<path d="M6.979 3.074a6 6 0 0 1 4.988 1.425l.037 .033l.034 -.03a6 6 0 0 1 4.733 -1.44l.246 .036a6 6 0 0 1 3.364 10.008l-.18 .185l-.048 .041l-7.45 7.379a1 1 0 0 1 -1.313 .082l-.094 -.082l-7.493 -7.422a6 6 0 0 1 3.176 -10.215z" stroke-width="0" fill="currentColor"/>"#,
                "</svg>"
            ),
        }
    }
}

/// Colors of the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Background color.
    pub background: &'static str,
    /// Text and icon color.
    pub color: &'static str,
    /// Border color.
    pub border: &'static str,
}

impl Palette {
    /// Green palette inviting a like.
    pub const NOT_LIKED: Self = Self {
        background: "#EFF7ED",
        color: "#4F946E",
        border: "#DAEDE4",
    };

    /// Muted palette once liked.
    pub const LIKED: Self = Self {
        background: "#EDEDED",
        color: "#CCCCCC",
        border: "#EDEDED",
    };
}

/// Everything the control displays for a given [`LikeState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    /// Heart icon.
    pub icon: Icon,
    /// `like` or `liked`.
    pub label: &'static str,
    /// Displayed count.
    pub count: u32,
    /// Colors.
    pub palette: Palette,
}

impl From<LikeState> for View {
    fn from(state: LikeState) -> Self {
        match state {
            LikeState::NotLiked { count } => Self {
                icon: Icon::Heart,
                label: "like",
                count,
                palette: Palette::NOT_LIKED,
            },
            LikeState::Liked { count } => Self {
                icon: Icon::HeartFilled,
                label: "liked",
                count,
                palette: Palette::LIKED,
            },
        }
    }
}

impl View {
    /// Renders the control as an HTML fragment.
    ///
    /// The anchor carries no `href`: activation is handled by the widget, which
    /// prevents the default navigation.
    #[must_use]
    pub fn to_html(&self, source: &Source) -> String {
        let Palette {
            background,
            color,
            border,
        } = self.palette;

        format!(
            concat!(
                r#"<div><a role="button" data-source="{source}" style="padding: 0 0.4em; display: inline-flex; align-items: center; "#,
                r#"background-color: {background}; color: {color}; border: 1px solid; border-color: {border}; border-radius: 2px; cursor: pointer;">"#,
                r#"{icon}<span style="padding: 0 4px">{label}</span><div style="padding: 0 4px">{count}</div></a></div>"#,
            ),
            source = html_escape::encode_double_quoted_attribute(source.as_str()),
            background = background,
            color = color,
            border = border,
            icon = self.icon.svg(),
            label = self.label,
            count = self.count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn not_liked_view() {
        let view = View::from(LikeState::NotLiked { count: 7 });
        assert_eq!(Icon::Heart, view.icon);
        assert_eq!("like", view.label);
        assert_eq!(7, view.count);
        assert_eq!(Palette::NOT_LIKED, view.palette);
    }

    #[test]
    fn liked_view() {
        let view = View::from(LikeState::Liked { count: 8 });
        assert_eq!(Icon::HeartFilled, view.icon);
        assert_eq!("liked", view.label);
        assert_eq!(8, view.count);
        assert_eq!(Palette::LIKED, view.palette);
    }

    #[test]
    fn html_contains_state() {
        let html = View::from(LikeState::Liked { count: 8 }).to_html(&Source::from("rust"));
        assert!(html.contains("background-color: #EDEDED"), "{html}");
        assert!(html.contains(r#"<span style="padding: 0 4px">liked</span>"#), "{html}");
        assert!(html.contains(r#"<div style="padding: 0 4px">8</div>"#), "{html}");
        assert!(html.contains(r#"fill="currentColor""#), "{html}");
    }

    #[test]
    fn html_escapes_source() {
        let html = View::from(LikeState::default()).to_html(&Source::from(r#""><script>"#));
        assert!(html.contains(r#"data-source="&quot;"#), "{html}");
        assert!(!html.contains(r#"data-source="""#), "{html}");
    }
}
