//! User-facing texts for every reply the bot can send.
//!
//! Each supported [`Locale`] maps to one static [`Messages`] table. The
//! Spanish table carries the bot's first wording; English is the default.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Language used for replies and fallback texts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Spanish.
    Es,
}

impl Locale {
    /// Static text table for this locale.
    pub fn messages(self) -> &'static Messages {
        match self {
            Self::En => &EN,
            Self::Es => &ES,
        }
    }

    /// Two-letter language code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            other => Err(format!("unsupported locale: {other:?}")),
        }
    }
}

/// One complete set of reply texts.
#[derive(Debug)]
pub struct Messages {
    /// Static usage text for `/help`.
    pub help: &'static str,

    /// Title line of the profile reply.
    pub profile_title: &'static str,
    /// Label before the display name.
    pub name_label: &'static str,
    /// Label before the bio.
    pub bio_label: &'static str,
    /// Label before the profile URL.
    pub url_label: &'static str,

    /// Header prepended to the home timeline.
    pub timeline_header: &'static str,
    /// Header prepended to notifications.
    pub notifications_header: &'static str,
    /// Header prepended to followed accounts.
    pub following_header: &'static str,
    /// Header prepended to search results.
    pub search_header: &'static str,
    /// Prompt sent when `/buscar` has no search term.
    pub search_prompt: &'static str,

    /// Empty home timeline.
    pub no_posts: &'static str,
    /// Empty notification list.
    pub no_notifications: &'static str,
    /// Empty relationship list.
    pub no_following: &'static str,
    /// Placeholder for a relationship entry that is not followed.
    pub not_following: &'static str,
    /// Empty search result.
    pub no_results: &'static str,

    /// Adapter fallback when the profile request fails.
    pub profile_unavailable: &'static str,
    /// Adapter fallback when the timeline request fails.
    pub timeline_unavailable: &'static str,
    /// Adapter fallback when the notifications request fails.
    pub notifications_unavailable: &'static str,
    /// Adapter fallback when the relationships request fails.
    pub following_unavailable: &'static str,
    /// Adapter fallback when the search request fails.
    pub search_unavailable: &'static str,

    /// Generic retry text when the profile handler crashes.
    pub profile_error: &'static str,
    /// Generic retry text when the timeline handler crashes.
    pub timeline_error: &'static str,
    /// Generic retry text when the notifications handler crashes.
    pub notifications_error: &'static str,
    /// Generic retry text when the following handler crashes.
    pub following_error: &'static str,
    /// Generic retry text when the search handler crashes.
    pub search_error: &'static str,
    /// Generic retry text when the help handler crashes.
    pub help_error: &'static str,
}

/// English texts.
pub static EN: Messages = Messages {
    help: "Hi! I'm your Mastodon bot. These are the queries you can run:\n\n\
           1) Get your Mastodon profile: /perfil\n\
           2) Get the latest toots: /toots\n\
           3) Get your Mastodon notifications: /notificaciones\n\
           4) See the accounts you follow: /siguiendo\n\
           5) Search toots: /buscar [term]",

    profile_title: "Mastodon profile:",
    name_label: "Name",
    bio_label: "Bio",
    url_label: "URL",

    timeline_header: "Latest posts:",
    notifications_header: "Notifications:",
    following_header: "Accounts you follow:",
    search_header: "Search results:",
    search_prompt: "Please enter a search term.",

    no_posts: "No recent posts.",
    no_notifications: "You have no notifications.",
    no_following: "You don't follow any accounts.",
    not_following: "Not followed",
    no_results: "No results found.",

    profile_unavailable: "Could not fetch the profile. Please try again later.",
    timeline_unavailable: "Could not fetch the latest toots. Please try again later.",
    notifications_unavailable: "Could not fetch the notifications. Please try again later.",
    following_unavailable: "Could not fetch the accounts you follow. Please try again later.",
    search_unavailable: "Could not fetch the search results. Please try again later.",

    profile_error: "There was an error fetching the profile. Try again later.",
    timeline_error: "There was an error fetching the toots. Try again later.",
    notifications_error: "There was an error fetching the notifications. Try again later.",
    following_error: "There was an error fetching the accounts you follow. Try again later.",
    search_error: "There was an error running the search. Try again later.",
    help_error: "There was an error showing the help. Try again later.",
};

/// Spanish texts.
pub static ES: Messages = Messages {
    help: "Hola! Soy tu bot de Mastodon. Aquí tienes las consultas que puedes realizar:\n\n\
           1) Obtener perfil Mastodon: /perfil\n\
           2) Obtener los últimos toots: /toots\n\
           3) Obtener notificaciones de Mastodon: /notificaciones\n\
           4) Ver las cuentas que sigues: /siguiendo\n\
           5) Buscar toots: /buscar [término]",

    profile_title: "Perfil de Mastodon:",
    name_label: "Nombre",
    bio_label: "Bio",
    url_label: "URL",

    timeline_header: "Últimos Toots:",
    notifications_header: "Notificaciones:",
    following_header: "Cuentas que sigues:",
    search_header: "Resultados de la búsqueda:",
    search_prompt: "Por favor, ingresa un término de búsqueda.",

    no_posts: "No hay toots recientes.",
    no_notifications: "No tienes notificaciones.",
    no_following: "No sigues a ninguna cuenta.",
    not_following: "No sigues a nadie",
    no_results: "No se encontraron resultados.",

    profile_unavailable: "No se pudo obtener el perfil. Por favor, intenta de nuevo más tarde.",
    timeline_unavailable:
        "No se pudieron obtener los últimos toots. Por favor, intenta de nuevo más tarde.",
    notifications_unavailable:
        "No se pudieron obtener las notificaciones. Por favor, intenta de nuevo más tarde.",
    following_unavailable:
        "No se pudieron obtener las cuentas que sigues. Por favor, intenta de nuevo más tarde.",
    search_unavailable:
        "No se pudieron obtener los resultados de la búsqueda. Por favor, intenta de nuevo más tarde.",

    profile_error: "Hubo un error al intentar obtener el perfil. Inténtalo de nuevo más tarde.",
    timeline_error: "Hubo un error al intentar obtener los toots. Inténtalo de nuevo más tarde.",
    notifications_error:
        "Hubo un error al intentar obtener las notificaciones. Inténtalo de nuevo más tarde.",
    following_error:
        "Hubo un error al intentar obtener las cuentas que sigues. Inténtalo de nuevo más tarde.",
    search_error: "Hubo un error al intentar realizar la búsqueda. Inténtalo de nuevo más tarde.",
    help_error: "Hubo un error al mostrar la ayuda. Inténtalo de nuevo más tarde.",
};
