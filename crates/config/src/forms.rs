//! Static localized form catalog

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use voice_assist_core::Language;

use crate::LocalizedText;

/// A form the user can fill in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDefinition {
    /// Stable key (e.g. "job-application")
    pub key: String,
    pub title: LocalizedText,
    /// Field labels, same order in both languages
    pub fields_en: Vec<String>,
    pub fields_hi: Vec<String>,
}

impl FormDefinition {
    pub fn title(&self, language: Language) -> &str {
        self.title.get(language)
    }

    pub fn fields(&self, language: Language) -> &[String] {
        match language {
            Language::English => &self.fields_en,
            Language::Hindi => &self.fields_hi,
        }
    }
}

fn form(key: &str, title_en: &str, title_hi: &str, en: &[&str], hi: &[&str]) -> FormDefinition {
    FormDefinition {
        key: key.to_string(),
        title: LocalizedText::new(title_en, title_hi),
        fields_en: en.iter().map(|s| s.to_string()).collect(),
        fields_hi: hi.iter().map(|s| s.to_string()).collect(),
    }
}

static BUILTIN: Lazy<FormCatalog> = Lazy::new(|| FormCatalog {
    forms: vec![
        form(
            "basic-registration",
            "Basic Registration Form",
            "बेसिक पंजीकरण फॉर्म",
            &["Name", "Email", "Phone", "Address"],
            &["नाम", "ईमेल", "फोन", "पता"],
        ),
        form(
            "college-admission",
            "College Admission Form",
            "कॉलेज प्रवेश फॉर्म",
            &[
                "Full Name",
                "Date of Birth",
                "Previous School",
                "Course Preference",
                "Guardian Name",
                "Guardian Contact",
            ],
            &[
                "पूरा नाम",
                "जन्म की तारीख",
                "पिछली स्कूल",
                "पाठ्यक्रम प्राथमिकता",
                "अभिभावक का नाम",
                "अभिभावक संपर्क",
            ],
        ),
        form(
            "job-application",
            "Job Application Form",
            "नौकरी के आवेदन फॉर्म",
            &[
                "Full Name",
                "Email",
                "Phone Number",
                "Position Applied",
                "Years of Experience",
                "Previous Company",
                "Expected Salary",
            ],
            &[
                "पूरा नाम",
                "ईमेल",
                "फोन नंबर",
                "आवेदन की गई स्थिति",
                "अनुभव के वर्ष",
                "पिछली कंपनी",
                "अपेक्षित वेतन",
            ],
        ),
    ],
});

/// Collection of forms, looked up by key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormCatalog {
    pub forms: Vec<FormDefinition>,
}

impl FormCatalog {
    /// Built-in forms
    pub fn builtin() -> &'static FormCatalog {
        &BUILTIN
    }

    pub fn get(&self, key: &str) -> Option<&FormDefinition> {
        self.forms.iter().find(|f| f.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.forms.iter().map(|f| f.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = FormCatalog::builtin();
        let keys: Vec<_> = catalog.keys().collect();
        assert_eq!(
            keys,
            vec!["basic-registration", "college-admission", "job-application"]
        );
    }

    #[test]
    fn test_fields_are_parallel() {
        for form in &FormCatalog::builtin().forms {
            assert_eq!(form.fields_en.len(), form.fields_hi.len(), "{}", form.key);
        }
    }

    #[test]
    fn test_localized_lookup() {
        let form = FormCatalog::builtin().get("basic-registration").unwrap();
        assert_eq!(form.title(Language::Hindi), "बेसिक पंजीकरण फॉर्म");
        assert_eq!(form.fields(Language::English)[1], "Email");
        assert_eq!(form.fields(Language::Hindi)[3], "पता");
        assert!(FormCatalog::builtin().get("tax-return").is_none());
    }
}
