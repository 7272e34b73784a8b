use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::enums::ApplicationStatus;
use crate::models::statistics::DailyStats;
use crate::registry::status_display;
use crate::theme::EffectiveTheme;

pub const LOCKED_ICON_COLOR: &str = "#22c55e";
pub const UNLOCKED_ICON_COLOR: &str = "#9ca3af";

/// One line of the daily chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesConfig {
    pub name: &'static str,
    pub color: &'static str,
    pub status: ApplicationStatus,
}

pub const SERIES_CONFIG: [SeriesConfig; 7] = [
    SeriesConfig { name: "Postulées", color: "#8b5cf6", status: ApplicationStatus::Applied },
    SeriesConfig {
        name: "Entretiens Téléphoniques",
        color: "#3b82f6",
        status: ApplicationStatus::PhoneInterview,
    },
    SeriesConfig {
        name: "Entretiens Techniques",
        color: "#06b6d4",
        status: ApplicationStatus::TechnicalInterview,
    },
    SeriesConfig { name: "Entretiens RH", color: "#10b981", status: ApplicationStatus::HrInterview },
    SeriesConfig { name: "Offres Reçues", color: "#22c55e", status: ApplicationStatus::Offer },
    SeriesConfig { name: "Refusées", color: "#ef4444", status: ApplicationStatus::Rejected },
    SeriesConfig { name: "Sans Réponse", color: "#64748b", status: ApplicationStatus::NoResponse },
];

/// "Auj.", "Hier", otherwise `dd/MM`.
pub fn day_label(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        "Auj.".to_string()
    } else if Some(day) == today.checked_sub_signed(Duration::days(1)) {
        "Hier".to_string()
    } else {
        day.format("%d/%m").to_string()
    }
}

/// Values of every series for one day, in legend order.
pub fn series_values(day: &DailyStats) -> Vec<(SeriesConfig, u64)> {
    SERIES_CONFIG
        .iter()
        .map(|config| (*config, day.count_for(config.status)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatEntry {
    pub name: &'static str,
    pub color: &'static str,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipCard {
    pub id: i64,
    pub company: String,
    pub position: String,
    pub status_label: String,
    pub color: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipContent {
    pub day_label: String,
    pub stats: Vec<StatEntry>,
    pub candidatures: Vec<TooltipCard>,
    pub locked: bool,
    pub theme: EffectiveTheme,
}

struct Palette {
    stats_bg: &'static str,
    list_bg: &'static str,
    muted: &'static str,
    text: &'static str,
    badge_bg: &'static str,
    border: &'static str,
}

impl Palette {
    fn for_theme(theme: EffectiveTheme) -> Self {
        if theme.is_dark() {
            Self {
                stats_bg: "#111827",
                list_bg: "#1f2937",
                muted: "#9ca3af",
                text: "#f3f4f6",
                badge_bg: "#1f2937",
                border: "#374151",
            }
        } else {
            Self {
                stats_bg: "#f9fafb",
                list_bg: "white",
                muted: "#6b7280",
                text: "#111827",
                badge_bg: "white",
                border: "#e5e7eb",
            }
        }
    }
}

impl TooltipContent {
    /// Zero-valued series are left out.
    pub fn for_day(day: &DailyStats, today: NaiveDate, locked: bool, theme: EffectiveTheme) -> Self {
        let stats = series_values(day)
            .into_iter()
            .filter(|(_, value)| *value > 0)
            .map(|(config, value)| StatEntry {
                name: config.name,
                color: config.color,
                value,
            })
            .collect();

        let candidatures = day
            .candidatures
            .iter()
            .map(|c| {
                let (status_label, color, icon) = status_display(&c.status);
                TooltipCard {
                    id: c.id,
                    company: c.company.clone(),
                    position: c.position.clone(),
                    status_label,
                    color,
                    icon,
                }
            })
            .collect();

        Self {
            day_label: day_label(day.day, today),
            stats,
            candidatures,
            locked,
            theme,
        }
    }

    pub fn lock_icon_color(&self) -> &'static str {
        if self.locked {
            LOCKED_ICON_COLOR
        } else {
            UNLOCKED_ICON_COLOR
        }
    }

    pub fn render_html(&self) -> String {
        let palette = Palette::for_theme(self.theme);
        let mut html = String::new();

        html.push_str("<div class=\"tooltip-content\" style=\"min-width: 320px; max-width: 400px;\">");
        html.push_str(&format!(
            "<div class=\"tooltip-header\"><i class=\"fas fa-calendar-day\"></i> {}\
             <i class=\"fas fa-lock\" style=\"color: {};\"></i></div>",
            escape(&self.day_label),
            self.lock_icon_color()
        ));

        html.push_str(&format!(
            "<div class=\"tooltip-stats\" style=\"background-color: {};\">",
            palette.stats_bg
        ));
        for stat in &self.stats {
            html.push_str(&format!(
                "<div class=\"stat-badge\" style=\"background: {}; border: 1px solid {};\">\
                 <span style=\"background-color: {};\"></span>\
                 <div style=\"color: {};\">{}</div>\
                 <div style=\"color: {};\">{}</div></div>",
                palette.badge_bg,
                palette.border,
                stat.color,
                palette.muted,
                escape(stat.name),
                palette.text,
                stat.value
            ));
        }
        html.push_str("</div>");

        if !self.candidatures.is_empty() {
            html.push_str(&format!(
                "<div class=\"tooltip-list\" style=\"background: {};\">\
                 <div style=\"color: {};\"><i class=\"fas fa-briefcase\"></i> Candidatures ({})</div>",
                palette.list_bg,
                palette.muted,
                self.candidatures.len()
            ));
            for (index, card) in self.candidatures.iter().enumerate() {
                html.push_str(&format!(
                    "<div id=\"cand-card-{}\" data-candidature-id=\"{}\" style=\"border-left: 3px solid {};\">\
                     <div style=\"color: {};\"><i class=\"fas fa-building\"></i> {}</div>\
                     <div style=\"color: {};\"><i class=\"fas fa-briefcase\"></i> {}</div>\
                     <div class=\"status-pill\" style=\"background-color: {};\"><i class=\"{}\"></i> {}</div>\
                     </div>",
                    index,
                    card.id,
                    card.color,
                    palette.text,
                    escape(&card.company),
                    palette.muted,
                    escape(&card.position),
                    card.color,
                    card.icon,
                    escape(&card.status_label)
                ));
            }
            html.push_str("</div>");
        }

        html.push_str("</div>");
        html
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
