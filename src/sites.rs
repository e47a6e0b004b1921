/// Well-known sites: URL checks, default icons and the quick-add catalog
use url::Url;

/// Icon used when nothing more specific matches
pub const GENERIC_ICON: &str = "fas fa-globe";

/// Brand icons, matched as substrings of the hostname. First match wins.
const BRAND_ICONS: &[(&str, &str)] = &[
    ("google.com", "fab fa-google"),
    ("youtube.com", "fab fa-youtube"),
    ("facebook.com", "fab fa-facebook"),
    ("twitter.com", "fab fa-twitter"),
    ("instagram.com", "fab fa-instagram"),
    ("linkedin.com", "fab fa-linkedin"),
    ("github.com", "fab fa-github"),
    ("stackoverflow.com", "fab fa-stack-overflow"),
    ("reddit.com", "fab fa-reddit"),
    ("wikipedia.org", "fab fa-wikipedia-w"),
    ("amazon.com", "fab fa-amazon"),
    ("ebay.com", "fab fa-ebay"),
    ("paypal.com", "fab fa-paypal"),
    ("spotify.com", "fab fa-spotify"),
    ("netflix.com", "fas fa-film"),
    ("twitch.tv", "fab fa-twitch"),
    ("discord.com", "fab fa-discord"),
    ("slack.com", "fab fa-slack"),
    ("dropbox.com", "fab fa-dropbox"),
    ("microsoft.com", "fab fa-microsoft"),
    ("apple.com", "fab fa-apple"),
];

/// Category icons, checked only when no brand matched
const CATEGORY_ICONS: &[(&[&str], &str)] = &[
    (&["mail", "gmail"], "fas fa-envelope"),
    (&["news", "cnn", "bbc"], "fas fa-newspaper"),
    (&["shop", "store"], "fas fa-shopping-cart"),
    (&["bank", "finance"], "fas fa-university"),
    (&["weather"], "fas fa-cloud-sun"),
];

/// A site offered in the quick-add list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickSite {
    pub name: &'static str,
    pub url: &'static str,
}

const fn site(name: &'static str, url: &'static str) -> QuickSite {
    QuickSite { name, url }
}

pub const QUICK_SITES: &[QuickSite] = &[
    site("Google", "https://www.google.com/"),
    site("GitHub", "https://www.github.com/"),
    site("Facebook", "https://www.facebook.com/"),
    site("YouTube", "https://www.youtube.com/"),
    site("Twitter", "https://www.twitter.com/"),
    site("LinkedIn", "https://www.linkedin.com/"),
    site("Instagram", "https://www.instagram.com/"),
    site("Reddit", "https://www.reddit.com/"),
    site("Microsoft", "https://www.microsoft.com/"),
    site("Apple", "https://www.apple.com/"),
    site("Amazon", "https://www.amazon.com/"),
    site("Netflix", "https://www.netflix.com/"),
    site("Gmail", "https://mail.google.com/"),
    site("Drive", "https://drive.google.com/"),
    site("Dropbox", "https://www.dropbox.com/"),
    site("Wikipedia", "https://www.wikipedia.org/"),
    site("Stack Overflow", "https://www.stackoverflow.com/"),
    site("Hacker News", "https://news.ycombinator.com/"),
    site("PayPal", "https://www.paypal.com/"),
    site("Spotify", "https://www.spotify.com/"),
    site("Twitch", "https://www.twitch.tv/"),
    site("Medium", "https://www.medium.com/"),
    site("Cloudflare", "https://www.cloudflare.com/"),
    site("Office", "https://www.office.com/"),
    site("Google Accounts", "https://accounts.google.com/signin"),
];

/// True when `url` parses as an absolute URL
pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}

/// Lower-cased hostname of `url`, if it has one
pub fn extract_hostname(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_lowercase();

    if host.is_empty() { None } else { Some(host) }
}

/// Pick an icon for a site: brand table first, then category hints, then the globe.
///
/// Never fails; unparseable URLs get the generic icon.
///
/// Examples:
/// - https://www.github.com/x → fab fa-github
/// - https://mail.google.com → fab fa-google (brand beats the "mail" category)
/// - https://webmail.example.org → fas fa-envelope
pub fn default_icon(url: &str) -> &'static str {
    let Some(hostname) = extract_hostname(url) else {
        return GENERIC_ICON;
    };

    if let Some((_, icon)) = BRAND_ICONS.iter().find(|(brand, _)| hostname.contains(brand)) {
        return *icon;
    }

    CATEGORY_ICONS
        .iter()
        .find(|(hints, _)| hints.iter().any(|hint| hostname.contains(hint)))
        .map(|(_, icon)| *icon)
        .unwrap_or(GENERIC_ICON)
}
