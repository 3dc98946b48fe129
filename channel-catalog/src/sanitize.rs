//! Display name folding and URL-safe slugs.

/// Fold `name` into printable ASCII.
///
/// Latin letters with diacritics lose their marks, a handful of ligatures
/// expand and anything else, control characters included, becomes `?`.
pub fn to_printable(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii() && !c.is_ascii_control() {
            out.push(c);
            continue;
        }
        match fold_char(c) {
            Some(folded) => out.push_str(folded),
            None => out.push('?'),
        }
    }
    out
}

/// Build the sanitized name for `name`.
///
/// Every character of the printable form is lowercased and kept when it is
/// alphanumeric, otherwise replaced by `-`. The result has the same length
/// as [`to_printable`] returns and is never empty for non-empty input.
pub fn slug(name: &str) -> String {
    to_printable(name)
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() {
                c
            } else {
                '-'
            }
        })
        .collect()
}

fn fold_char(c: char) -> Option<&'static str> {
    let folded = match c {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => "A",
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'Æ' => "AE",
        'æ' => "ae",
        'Ç' | 'Ć' | 'Ĉ' | 'Ċ' | 'Č' => "C",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'Ď' | 'Đ' | 'Ð' => "D",
        'ď' | 'đ' | 'ð' => "d",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => "E",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => "G",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'Ĥ' | 'Ħ' => "H",
        'ĥ' | 'ħ' => "h",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => "I",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'Ĵ' => "J",
        'ĵ' => "j",
        'Ķ' => "K",
        'ķ' => "k",
        'Ĺ' | 'Ļ' | 'Ľ' | 'Ŀ' | 'Ł' => "L",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'Ñ' | 'Ń' | 'Ņ' | 'Ň' => "N",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ŏ' | 'Ő' => "O",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'Œ' => "OE",
        'œ' => "oe",
        'Ŕ' | 'Ŗ' | 'Ř' => "R",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'Ś' | 'Ŝ' | 'Ş' | 'Š' => "S",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'Ţ' | 'Ť' | 'Ŧ' => "T",
        'ţ' | 'ť' | 'ŧ' => "t",
        'Þ' => "TH",
        'þ' => "th",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => "U",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'Ŵ' => "W",
        'ŵ' => "w",
        'Ý' | 'Ÿ' | 'Ŷ' => "Y",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'Ź' | 'Ż' | 'Ž' => "Z",
        'ź' | 'ż' | 'ž' => "z",
        // Typographic punctuation
        '\u{00A0}' | '\u{2002}' | '\u{2003}' | '\u{2009}' => " ",
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' => "-",
        '\u{2018}' | '\u{2019}' => "'",
        '\u{201C}' | '\u{201D}' => "\"",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_slug(s: &str) -> bool {
        s.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    #[test]
    fn test_slug_basic() {
        assert_eq!(slug("BBC One"), "bbc-one");
        assert_eq!(slug("ZDF"), "zdf");
        assert_eq!(slug("Das Erste HD"), "das-erste-hd");
    }

    #[test]
    fn test_slug_punctuation() {
        let s = slug("Canal+");
        assert!(is_slug(&s));
        assert_eq!(s.len(), to_printable("Canal+").len());
        assert_eq!(s, "canal-");

        assert_eq!(slug("!!!"), "---");
    }

    #[test]
    fn test_slug_folds_diacritics() {
        assert_eq!(to_printable("Télé Française"), "Tele Francaise");
        assert_eq!(slug("Télé Française"), "tele-francaise");
        assert_eq!(slug("Straße"), "strasse");
    }

    #[test]
    fn test_slug_unknown_characters() {
        assert_eq!(to_printable("NHK総合"), "NHK??");
        let s = slug("NHK総合");
        assert_eq!(s, "nhk--");
        assert!(is_slug(&s));
    }

    #[test]
    fn test_printable_replaces_controls() {
        assert_eq!(to_printable("a\tb\u{0085}c"), "a?b?c");
        assert_eq!(slug("\n"), "-");
    }

    #[test]
    fn test_slug_non_empty() {
        for name in ["x", "?", "\u{4e00}", " ", "Ø", "\t"] {
            assert!(!slug(name).is_empty(), "empty slug for {:?}", name);
        }
    }
}
