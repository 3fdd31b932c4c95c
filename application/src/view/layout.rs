//! Layout around every view.

use itertools::Itertools as _;
use service::domain::{notification::Kind, Notification};

use crate::Context;

/// Renders the header with the current user, language and theme.
#[must_use]
pub fn header(ctx: &Context) -> String {
    let svc = ctx.service();
    let user = match (svc.auth().full_name(), svc.auth().role_name()) {
        (Some(name), Some(role)) => format!("{name} ({role})"),
        (Some(name), None) => name,
        (None, _) => ctx.t("auth.notLoggedIn"),
    };
    let locale = svc.locale().info();
    let theme = svc.theme().definition();

    format!(
        "{user} | {} ({}) | {}{}",
        locale.name,
        svc.locale().direction(),
        theme.display_name,
        if svc.theme().is_dark() { " *" } else { "" },
    )
}

/// Renders all the [`Notification`]s shown during this run.
#[must_use]
pub fn notifications(ctx: &Context) -> String {
    render_notifications(&ctx.service().notifications().all())
}

/// Renders the provided [`Notification`]s, one per line, newest last.
fn render_notifications(items: &[Notification]) -> String {
    items
        .iter()
        .map(|n| {
            let mark = match n.kind {
                Kind::Success => "+",
                Kind::Error => "!",
                Kind::Warning => "~",
                Kind::Info => "i",
            };
            if n.message.is_empty() {
                format!("[{mark}] {}", n.title)
            } else {
                format!("[{mark}] {}: {}", n.title, n.message)
            }
        })
        .join("\n")
}

#[cfg(test)]
mod tests {
    use service::domain::{
        notification::{self, Kind},
        Notification,
    };

    use super::render_notifications;

    #[test]
    fn renders_newest_last() {
        let items = [
            Notification::draft(Kind::Error, "Error", "Server is down")
                .into_notification(notification::Id::new()),
            Notification::draft(Kind::Success, "Saved", "")
                .into_notification(notification::Id::new()),
        ];

        assert_eq!(
            render_notifications(&items),
            "[!] Error: Server is down\n[+] Saved",
        );
    }
}
