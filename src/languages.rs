/// Maps a request-level `lang_code` to the OCR models and translation source
/// it implies. OCR hints pair the source script with English because pages
/// routinely mix both; the translation source is only used in per-region
/// mode (whole-page mode asks the backend to auto-detect).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageProfile {
    pub code: &'static str,
    pub name: &'static str,
    pub ocr_languages: &'static str,
    pub translation_source: &'static str,
}

pub const DEFAULT_LANG_CODE: &str = "ja";

const PROFILES: &[LanguageProfile] = &[
    LanguageProfile {
        code: "ja",
        name: "Japanese",
        ocr_languages: "jpn+eng",
        translation_source: "ja",
    },
    LanguageProfile {
        code: "zh",
        name: "Chinese (Simplified)",
        ocr_languages: "chi_sim+eng",
        translation_source: "zh-CN",
    },
    LanguageProfile {
        code: "ko",
        name: "Korean",
        ocr_languages: "kor+eng",
        translation_source: "ko",
    },
    LanguageProfile {
        code: "en",
        name: "English",
        ocr_languages: "eng",
        translation_source: "en",
    },
];

pub fn profile(code: &str) -> Option<&'static LanguageProfile> {
    let code = code.trim().to_ascii_lowercase();
    PROFILES.iter().find(|profile| profile.code == code)
}

pub fn default_profile() -> &'static LanguageProfile {
    profile(DEFAULT_LANG_CODE).expect("default language profile must exist")
}

pub fn supported_codes() -> Vec<&'static str> {
    PROFILES.iter().map(|profile| profile.code).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_japanese_with_mixed_script_hint() {
        let profile = default_profile();
        assert_eq!(profile.code, "ja");
        assert_eq!(profile.ocr_languages, "jpn+eng");
    }

    #[test]
    fn lookup_normalizes_case_and_whitespace() {
        assert_eq!(profile(" JA ").unwrap().code, "ja");
        assert_eq!(profile("ko").unwrap().ocr_languages, "kor+eng");
        assert!(profile("xx").is_none());
        assert!(profile("").is_none());
    }

    #[test]
    fn supported_codes_lists_every_profile() {
        assert_eq!(supported_codes(), vec!["ja", "zh", "ko", "en"]);
    }
}
