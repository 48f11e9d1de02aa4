use crate::domain::model::{Facing, FlowSnapshot, Phase, Verdict};
use crate::utils::error::{Result, RiceError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl std::str::FromStr for Locale {
    type Err = RiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "ru" | "russian" => Ok(Locale::Ru),
            other => Err(RiceError::InvalidConfigValueError {
                field: "locale".to_string(),
                value: other.to_string(),
                reason: "Expected 'en' or 'ru'".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    GrantPermission,
    ToggleFacing,
    Capture,
    Clear,
}

impl Affordance {
    /// Keyword typed by the user to trigger this affordance.
    pub fn command(self) -> &'static str {
        match self {
            Affordance::GrantPermission => "grant",
            Affordance::ToggleFacing => "toggle",
            Affordance::Capture => "capture",
            Affordance::Clear => "again",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    PermissionPrompt,
    Preview { facing: Facing },
    Capturing,
    Analyzing,
    Result { verdict: Verdict },
}

impl Screen {
    pub fn from_snapshot(snapshot: &FlowSnapshot) -> Self {
        match snapshot.phase {
            Phase::PermissionRequired => Screen::PermissionPrompt,
            Phase::Idle => Screen::Preview {
                facing: snapshot.facing,
            },
            Phase::Capturing => Screen::Capturing,
            Phase::Uploading => Screen::Analyzing,
            Phase::Displaying(verdict) => Screen::Result { verdict },
        }
    }

    pub fn affordances(&self) -> &'static [Affordance] {
        match self {
            Screen::PermissionPrompt => &[Affordance::GrantPermission],
            Screen::Preview { .. } => &[Affordance::ToggleFacing, Affordance::Capture],
            Screen::Capturing | Screen::Analyzing => &[],
            Screen::Result { .. } => &[Affordance::Clear],
        }
    }

    pub fn allows(&self, affordance: Affordance) -> bool {
        self.affordances().contains(&affordance)
    }

    pub fn shows_loading(&self) -> bool {
        matches!(self, Screen::Capturing | Screen::Analyzing)
    }
}

impl Locale {
    pub fn verdict_text(self, verdict: Verdict) -> &'static str {
        match (self, verdict) {
            (Locale::En, Verdict::NoFacesFound) => "Found nobody...",
            (Locale::En, Verdict::SingleFaceDefinite) => "Definitely likes rice!",
            (Locale::En, Verdict::SingleFaceLikely) => "Probably likes rice!",
            (Locale::En, Verdict::MultipleFacesLikely) => "They probably like rice!",
            (Locale::En, Verdict::MultipleFacesAtLeastOnePositive) => "At least one of them likes rice!",
            (Locale::En, Verdict::MultipleFacesUnsupported) => "Only one face per photo, please!",
            (Locale::Ru, Verdict::NoFacesFound) => "Никого не нашел...",
            (Locale::Ru, Verdict::SingleFaceDefinite) => "Однозначно любит рис!",
            (Locale::Ru, Verdict::SingleFaceLikely) => "Возможно любит рис!",
            (Locale::Ru, Verdict::MultipleFacesLikely) => "Возможно любят рис!",
            (Locale::Ru, Verdict::MultipleFacesAtLeastOnePositive) => "Как минимум один любит рис!",
            (Locale::Ru, Verdict::MultipleFacesUnsupported) => "Нужно ровно одно лицо на фото!",
        }
    }

    pub fn permission_text(self) -> &'static str {
        match self {
            Locale::En => "Camera permission required!",
            Locale::Ru => "Требуется разрешение на камеру!",
        }
    }

    pub fn analyzing_text(self) -> &'static str {
        match self {
            Locale::En => "Analyzing...",
            Locale::Ru => "Анализируем...",
        }
    }

    pub fn error_title(self) -> &'static str {
        match self {
            Locale::En => "An error occurred",
            Locale::Ru => "Возникла ошибка",
        }
    }

    pub fn not_available_text(self) -> &'static str {
        match self {
            Locale::En => "That action is not available right now.",
            Locale::Ru => "Сейчас это действие недоступно.",
        }
    }

    pub fn affordance_label(self, affordance: Affordance) -> &'static str {
        match (self, affordance) {
            (Locale::En, Affordance::GrantPermission) => "Grant permission",
            (Locale::En, Affordance::ToggleFacing) => "Switch camera",
            (Locale::En, Affordance::Capture) => "Check",
            (Locale::En, Affordance::Clear) => "Check again",
            (Locale::Ru, Affordance::GrantPermission) => "Дать разрешение",
            (Locale::Ru, Affordance::ToggleFacing) => "Переключить камеру",
            (Locale::Ru, Affordance::Capture) => "Проверить",
            (Locale::Ru, Affordance::Clear) => "Проверить еще",
        }
    }

    pub fn status_text(self, screen: &Screen) -> String {
        match screen {
            Screen::PermissionPrompt => self.permission_text().to_string(),
            Screen::Preview { facing } => match self {
                Locale::En => format!("Camera ready ({facing})"),
                Locale::Ru => match facing {
                    Facing::Back => "Камера готова (основная)".to_string(),
                    Facing::Front => "Камера готова (фронтальная)".to_string(),
                },
            },
            Screen::Capturing | Screen::Analyzing => self.analyzing_text().to_string(),
            Screen::Result { verdict } => self.verdict_text(*verdict).to_string(),
        }
    }
}

/// Status line, pending error and the available actions, one per line.
pub fn render(snapshot: &FlowSnapshot, locale: Locale) -> String {
    let screen = Screen::from_snapshot(snapshot);
    let mut lines = vec![locale.status_text(&screen)];

    if let Some(notification) = &snapshot.notification {
        lines.push(format!(
            "{}: {}",
            locale.error_title(),
            notification.message
        ));
    }

    for affordance in screen.affordances() {
        lines.push(format!(
            "  [{}] {}",
            affordance.command(),
            locale.affordance_label(*affordance)
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Notification;

    fn snapshot(phase: Phase) -> FlowSnapshot {
        FlowSnapshot {
            phase,
            facing: Facing::Back,
            photo_uri: None,
            scores: None,
            notification: None,
        }
    }

    #[test]
    fn test_affordances_per_screen() {
        assert_eq!(
            Screen::from_snapshot(&snapshot(Phase::PermissionRequired)).affordances(),
            &[Affordance::GrantPermission]
        );
        assert_eq!(
            Screen::from_snapshot(&snapshot(Phase::Idle)).affordances(),
            &[Affordance::ToggleFacing, Affordance::Capture]
        );
        let analyzing = Screen::from_snapshot(&snapshot(Phase::Uploading));
        assert!(analyzing.affordances().is_empty());
        assert!(analyzing.shows_loading());

        let result = Screen::from_snapshot(&snapshot(Phase::Displaying(Verdict::NoFacesFound)));
        assert!(result.allows(Affordance::Clear));
        assert!(!result.allows(Affordance::Capture));
    }

    #[test]
    fn test_render_result_in_russian() {
        let text = render(
            &snapshot(Phase::Displaying(Verdict::SingleFaceDefinite)),
            Locale::Ru,
        );
        assert_eq!(text, "Однозначно любит рис!\n  [again] Проверить еще\n");
    }

    #[test]
    fn test_render_includes_notification() {
        let mut snap = snapshot(Phase::Idle);
        snap.notification = Some(Notification {
            message: "Could not analyze the photo".to_string(),
            suggestion: "retry".to_string(),
        });

        let text = render(&snap, Locale::En);
        assert!(text.starts_with("Camera ready (back)\n"));
        assert!(text.contains("An error occurred: Could not analyze the photo"));
        assert!(text.contains("[capture] Check"));
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!("RU".parse::<Locale>().unwrap(), Locale::Ru);
        assert!("de".parse::<Locale>().is_err());
    }
}
