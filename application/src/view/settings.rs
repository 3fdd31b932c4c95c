//! Language and theme settings views.

use itertools::Itertools as _;
use service::{
    command::{self, save_custom_theme},
    domain::{
        locale::{Locale, Params},
        theme::{self, Definition, Name},
    },
    Command as _,
};

use crate::{args, define_error, AsError, Context, Error};

/// Switches to the locale with the provided `code`, or lists the available
/// ones if it's not provided.
///
/// # Errors
///
/// Errors if the chosen locale cannot be persisted.
pub async fn locale(ctx: &Context, code: Option<String>) -> Result<String, Error> {
    let Some(code) = code else {
        return Ok(render_locales(
            ctx.service().locale().available(),
            ctx.service().locale().info(),
        ));
    };

    let svc = ctx.service();
    match svc
        .execute(command::SetLocale(code.clone()))
        .await
        .map_err(AsError::into_error)?
    {
        Some(_) => {
            let text = ctx.t_with(
                "settings.languageChanged",
                &Params::new().with("name", svc.locale().info().name),
            );
            _ = svc
                .notifications()
                .success(ctx.t("settings.language"), text.clone());
            Ok(text)
        }
        None => {
            let text = ctx.t_with(
                "settings.unknownLanguage",
                &Params::new().with("code", &code),
            );
            _ = svc
                .notifications()
                .warning(ctx.t("settings.language"), text.clone());
            Ok(text)
        }
    }
}

/// Opens the theme view requested by the provided [`args::Theme`].
///
/// # Errors
///
/// Errors if the theme cannot be changed or persisted.
pub async fn theme(ctx: &Context, cmd: args::Theme) -> Result<String, Error> {
    use args::Theme as T;

    define_error! {
        enum ThemeError {
            #[code = "THEME_NOT_FOUND"]
            #[key = "errors.notFound"]
            #[message = "No such custom theme"]
            NotFound,
        }
    }

    let svc = ctx.service();
    let applied = match cmd {
        T::Show => {
            return Ok(render_themes(
                &svc.theme().available(),
                &svc.theme().current(),
                &svc.theme().css_variables(),
            ));
        }
        T::Set { name } => svc
            .execute(command::SetTheme(name))
            .await
            .map_err(AsError::into_error)?,
        T::Toggle => svc
            .execute(command::ToggleTheme)
            .await
            .map_err(AsError::into_error)?,
        T::Create {
            name,
            display_name,
            base,
        } => {
            let definition = Definition {
                name: name.clone(),
                display_name: display_name.unwrap_or_else(|| name.clone()),
                colors: match base {
                    Name::Light => Definition::light(),
                    Name::Dark => Definition::dark(),
                    Name::Custom(base) => svc
                        .theme()
                        .custom()
                        .remove(&base)
                        .unwrap_or_else(|| svc.theme().definition()),
                    Name::Auto => svc.theme().definition(),
                }
                .colors,
            };
            _ = svc
                .execute(command::SaveCustomTheme::Create {
                    name: name.clone(),
                    definition,
                })
                .await
                .map_err(AsError::into_error)?;
            Name::Custom(name)
        }
        T::Rename { name, display_name } => {
            let changes = theme::Changes {
                display_name: Some(display_name),
                ..theme::Changes::default()
            };
            let found = svc
                .execute(command::SaveCustomTheme::Update {
                    name: name.clone(),
                    changes,
                })
                .await
                .map_err(AsError::into_error)?;
            if !found {
                return Err(ThemeError::NotFound.into());
            }
            Name::Custom(name)
        }
        T::Delete { name } => {
            let found = svc
                .execute(command::SaveCustomTheme::Delete { name: name.clone() })
                .await
                .map_err(AsError::into_error)?;
            if !found {
                return Err(ThemeError::NotFound.into());
            }
            return Ok(format!("{}: {name}", ctx.t("common.delete")));
        }
    };

    let text = ctx.t_with(
        "settings.themeChanged",
        &Params::new().with("name", &applied),
    );
    _ = svc
        .notifications()
        .success(ctx.t("settings.theme"), text.clone());
    Ok(text)
}

/// Renders the provided [`Locale`]s marking the `current` one.
fn render_locales(available: &[Locale], current: &Locale) -> String {
    available
        .iter()
        .map(|l| {
            format!(
                "{} {} {} ({}){}",
                if l == current { "*" } else { " " },
                l.code,
                l.name,
                l.direction,
                if l.is_rtl() { " RTL" } else { "" },
            )
        })
        .join("\n")
}

/// Renders the provided theme [`Definition`]s marking the `current` one,
/// followed by the CSS variables of the current theme.
fn render_themes(
    available: &[Definition],
    current: &Name,
    variables: &[(String, String)],
) -> String {
    available
        .iter()
        .map(|d| {
            format!(
                "{} {} ({})",
                if d.name == current.as_str() { "*" } else { " " },
                d.name,
                d.display_name,
            )
        })
        .chain(std::iter::once(String::new()))
        .chain(variables.iter().map(|(k, v)| format!("{k}: {v}")))
        .join("\n")
}

impl AsError for save_custom_theme::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Json(_) => None,
            Self::Storage(e) => e.try_as_error(),
        }
    }
}
