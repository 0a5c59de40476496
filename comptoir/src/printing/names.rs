//! Client name normalisation
//!
//! Person names are printed as `SURNAME Firstname I.`; organisation names
//! are title-cased with known acronyms kept upper-case.

use super::textgrid::{char_len, take_chars};

/// Keywords that mark a client as an organisation (matched as substrings,
/// case-insensitively)
const ORGANIZATION_KEYWORDS: &[&str] = &[
    "EPP", "CEG", "LYCEE", "LYCÉE", "COLLEGE", "COLLÈGE", "ECOLE", "ÉCOLE", "UNIVERSITE",
    "UNIVERSITÉ", "ASSOCIATION", "ONG", "SARL", "SA", "EURL", "SOCIETE", "SOCIÉTÉ",
    "ENTREPRISE", "MAGASIN", "BOUTIQUE", "CENTRE", "INSTITUT", "CABINET", "HOPITAL", "HÔPITAL",
    "CLINIQUE", "PHARMACIE", "ÉGLISE", "EGLISE", "TEMPLE", "MOSQUÉE", "MOSQUEE",
];

pub fn is_organization(name: &str) -> bool {
    let upper = name.to_uppercase();
    ORGANIZATION_KEYWORDS.iter().any(|k| upper.contains(k))
}

/// Upper-case the first character, lower-case the rest
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `"rakoto jean paul"` → `"RAKOTO Jean P."`
///
/// With `max_len`, a name whose surname and first name together exceed the
/// budget drops its initials and has the first name cut to fit. The surname
/// is never cut. Blank input is returned unchanged.
pub fn format_person_name(name: &str, max_len: Option<usize>) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    let Some((surname, given)) = parts.split_first() else {
        return name.to_string();
    };

    let surname = surname.to_uppercase();
    let first = given.first().map(|f| capitalize(f));
    let initials: Vec<String> = given
        .iter()
        .skip(1)
        .filter_map(|g| g.chars().next())
        .map(|c| format!("{}.", c.to_uppercase()))
        .collect();

    let mut formatted = surname.clone();
    if let Some(first) = &first {
        formatted.push(' ');
        formatted.push_str(first);
    }
    for initial in &initials {
        formatted.push(' ');
        formatted.push_str(initial);
    }

    let Some(max_len) = max_len else {
        return formatted;
    };
    if char_len(&formatted) <= max_len {
        return formatted;
    }
    let Some(first) = first else {
        return surname;
    };
    let surname_len = char_len(&surname);
    if surname_len + 1 + char_len(&first) <= max_len {
        return format!("{surname} {first}");
    }
    match max_len.checked_sub(surname_len + 1) {
        Some(room) if room > 0 => format!("{surname} {}", take_chars(&first, room)),
        _ => surname,
    }
}

/// `"lycee technique"` → `"Lycee Technique"`, `"epp ambohipo"` → `"EPP Ambohipo"`
pub fn format_organization_name(name: &str) -> String {
    if name.trim().is_empty() {
        return name.to_string();
    }
    name.split_whitespace()
        .map(|word| {
            let upper = word.to_uppercase();
            if ORGANIZATION_KEYWORDS.contains(&upper.as_str()) {
                upper
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a client name, choosing the person or organisation rules
pub fn format_client_name(name: &str, max_len: Option<usize>) -> String {
    if name.trim().is_empty() {
        return name.to_string();
    }
    let name = name.trim();
    if is_organization(name) {
        format_organization_name(name)
    } else {
        format_person_name(name, max_len)
    }
}
