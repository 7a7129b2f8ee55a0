use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::{SERVICES_NEEDED, Service};
use crate::i18n::{BilingualText, Locale};
use crate::spec::question::{AskWhen, ChoiceOption, QuestionKind, QuestionSpec};

/// Ordered set of questions with their selectable options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OptionCatalog {
    pub id: String,
    pub title: BilingualText,
    pub version: String,
    pub questions: Vec<QuestionSpec>,
}

static BUILTIN: Lazy<OptionCatalog> = Lazy::new(build_builtin);

impl OptionCatalog {
    /// The wellness-centre intake questionnaire.
    pub fn builtin() -> &'static OptionCatalog {
        &BUILTIN
    }

    pub fn question(&self, id: &str) -> Option<&QuestionSpec> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// Display label for a stored value, or the raw value when the catalog has no entry.
    pub fn label_or_raw(&self, id: &str, value: &str, locale: Locale) -> String {
        self.question(id)
            .and_then(|question| question.option(value))
            .map(|option| option.label.resolve(locale))
            .unwrap_or_else(|| value.to_string())
    }

    pub fn title_of(&self, id: &str, locale: Locale) -> String {
        self.question(id)
            .map(|question| question.title.resolve(locale))
            .unwrap_or_else(|| id.to_string())
    }

    pub fn required_ids(&self) -> impl Iterator<Item = &str> {
        self.questions
            .iter()
            .filter(|question| question.required)
            .map(|question| question.id.as_str())
    }
}

fn bi(en: &str, hi: &str) -> BilingualText {
    BilingualText::new(en, hi)
}

fn opt(value: &str, en: &str, hi: &str) -> ChoiceOption {
    ChoiceOption::new(value, bi(en, hi))
}

fn opt_en(value: &str, en: &str) -> ChoiceOption {
    ChoiceOption::new(value, BilingualText::english(en))
}

fn question(id: &str, number: Option<u8>, title: BilingualText, kind: QuestionKind) -> QuestionSpec {
    QuestionSpec {
        id: id.to_string(),
        number,
        title,
        kind,
        required: false,
        options: Vec::new(),
        ask_when: None,
    }
}

fn text(id: &str, title: BilingualText) -> QuestionSpec {
    question(id, None, title, QuestionKind::Text)
}

fn required_text(id: &str, title: BilingualText) -> QuestionSpec {
    QuestionSpec {
        required: true,
        ..text(id, title)
    }
}

fn with_options(mut spec: QuestionSpec, options: Vec<ChoiceOption>) -> QuestionSpec {
    spec.options = options;
    spec
}

fn ask_when(mut spec: QuestionSpec, question: &str, equals: &str) -> QuestionSpec {
    spec.ask_when = Some(AskWhen {
        question: question.to_string(),
        equals: equals.to_string(),
    });
    spec
}

fn yes_no() -> Vec<ChoiceOption> {
    vec![opt("yes", "Yes", "हाँ"), opt("no", "No", "नहीं")]
}

fn ratings() -> Vec<ChoiceOption> {
    (1..=5)
        .map(|score| opt_en(&score.to_string(), &format!("{score}/5")))
        .collect()
}

pub fn service_label(service: Service) -> BilingualText {
    match service {
        Service::GeneralOpd => bi("General OPD", "सामान्य OPD"),
        Service::Daycare => bi("Daycare treatments", "डेकेयर ट्रीटमेंट"),
        Service::SuperSpeciality => bi("Super‑speciality consultations", "सुपर‑स्पेशलिटी परामर्श"),
        Service::Diagnostic => bi("Diagnostic lab & imaging", "डायग्नोस्टिक लैब और इमेजिंग"),
        Service::CghsSupport => bi("CGHS / CAPF support", "CGHS / CAPF सहायता"),
        Service::GenericMedicines => bi("Affordable generic medicines", "सस्ती जेनेरिक दवाएँ"),
        Service::PreventiveCheckups => bi("Preventive health checkups", "निवारक स्वास्थ्य जांच"),
    }
}

fn build_builtin() -> OptionCatalog {
    let mut questions = vec![
        required_text("name", bi("Name", "नाम")),
        required_text("age", bi("Age", "आयु")),
        with_options(
            QuestionSpec {
                required: true,
                ..question("gender", None, bi("Gender", "लिंग"), QuestionKind::Choice)
            },
            vec![
                opt("male", "Male", "पुरुष"),
                opt("female", "Female", "महिला"),
                opt("other", "Other", "अन्य"),
            ],
        ),
        required_text("contact", bi("Contact details", "संपर्क विवरण")),
        required_text("address", bi("Address", "पता")),
        required_text("emergency_contact", bi("Emergency contact", "आपातकालीन संपर्क")),
        with_options(
            QuestionSpec {
                required: true,
                ..question("blood_group", None, bi("Blood group", "रक्त समूह"), QuestionKind::Choice)
            },
            ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"]
                .into_iter()
                .map(|group| opt_en(group, group))
                .collect(),
        ),
        text("area", bi("Local area", "स्थानीय क्षेत्र")),
        with_options(
            question(
                "visited_doctor",
                Some(1),
                bi(
                    "Have you visited any trained doctor (MBBS/MD/AIIMS alumni) in Chhatarpur in the last 12 months?",
                    "क्या आपने पिछले 12 महीनों में Chhatarpur में किसी प्रशिक्षित डॉक्टर से इलाज कराया है?",
                ),
                QuestionKind::Choice,
            ),
            yes_no(),
        ),
        with_options(
            question(
                "no_visit_reasons",
                Some(2),
                bi(
                    "If NO, why? (Choose all that apply)",
                    "अगर नहीं, तो वजह क्या थी? (सभी लागू विकल्प चुनें)",
                ),
                QuestionKind::MultiChoice,
            ),
            vec![
                opt("no-trained-doctor", "No trained doctor nearby", "पास प्रशिक्षित डॉक्टर नहीं"),
                opt(
                    "prefer-local",
                    "Prefer local/quack because cheaper",
                    "सस्ता होने के कारण स्थानीय/क्वैक चुनते हैं",
                ),
                opt("long-waiting", "Long waiting", "लम्बा इंतज़ार"),
                opt("cost", "Cost of treatment", "इलाज की लागत"),
                opt("lack-awareness", "Lack of awareness", "जानकारी की कमी"),
            ],
        ),
        text("other_reason", bi("Other", "अन्य")),
        with_options(
            question(
                SERVICES_NEEDED,
                Some(3),
                bi(
                    "Which services do you need most in your area? (Rank top 3)",
                    "आपके क्षेत्र में किन सेवाओं की सबसे ज़्यादा ज़रूरत है? (टॉप 3 चुनें और क्रम दें)",
                ),
                QuestionKind::Ranking,
            ),
            Service::ALL
                .into_iter()
                .map(|service| ChoiceOption::new(service.as_str(), service_label(service)))
                .collect(),
        ),
        with_options(
            question(
                "use_wellness_centre",
                Some(4),
                bi(
                    "Would you use a local wellness centre if AIIMS‑trained doctors and reliable diagnostics were available at affordable prices?",
                    "यदि AIIMS‑प्रशिक्षित डॉक्टर और भरोसेमंद डायग्नोस्टिक सस्ती कीमत पर उपलब्ध हों, क्या आप स्थानीय वेलनेस सेंटर का उपयोग करेंगे?",
                ),
                QuestionKind::Choice,
            ),
            vec![
                opt("definitely", "Definitely", "ज़रूर"),
                opt("maybe", "Maybe", "शायद"),
                opt("not-interested", "Not interested", "रुचि नहीं"),
            ],
        ),
        with_options(
            question(
                "cghs_importance",
                Some(5),
                bi(
                    "How important is having CGHS/CAPF empanelled services nearby for you or your family?",
                    "CGHS/CAPF सेवाएँ आपके लिए कितनी ज़रूरी हैं?",
                ),
                QuestionKind::Rating,
            ),
            ratings(),
        ),
        with_options(
            question(
                "wrong_treatment",
                Some(6),
                bi(
                    "Have you ever received wrong or unnecessary tests/treatments locally?",
                    "क्या आपको स्थानीय स्तर पर कभी गलत या अनावश्यक टेस्ट/इलाज मिला है?",
                ),
                QuestionKind::Choice,
            ),
            vec![
                opt("yes-often", "Yes—often", "हाँ—अक्सर"),
                opt("yes-once-twice", "Yes—once or twice", "हाँ—एक / दो बार"),
                opt("no", "No", "नहीं"),
            ],
        ),
        text("wrong_treatment_details", bi("Details", "विवरण")),
        with_options(
            question(
                "blood_test_cost",
                Some(7),
                bi(
                    "What is an acceptable average cost for a routine blood test package for families here?",
                    "यहाँ परिवार के लिए सामान्य ब्लड टेस्ट पैकेज की स्वीकार्य औसत लागत क्या है?",
                ),
                QuestionKind::Choice,
            ),
            vec![
                opt("less-300", "Less than ₹300", "₹300 से कम"),
                opt_en("300-600", "₹300–₹600"),
                opt_en("600-1000", "₹600–₹1000"),
                opt("more-1000", "More than ₹1000", "₹1000 से अधिक"),
            ],
        ),
        with_options(
            question(
                "generic_medicines",
                Some(8),
                bi(
                    "Would you prefer generic medicines dispensed at the centre if quality assured?",
                    "अगर गुणवत्तापूर्ण सुनिश्चित हो तो क्या आप सेंटर पर जेनेरिक दवाइयाँ लेना पसंद करेंगे?",
                ),
                QuestionKind::Choice,
            ),
            vec![
                opt("yes", "Yes", "हाँ"),
                opt("no", "No", "नहीं"),
                opt("unsure", "Unsure", "निश्चित नहीं"),
            ],
        ),
        with_options(
            question(
                "visit_hours",
                Some(9),
                bi(
                    "Which hours are best for you to visit the wellness centre?",
                    "किस समय आप वेलनेस सेंटर आना पसंद करेंगे?",
                ),
                QuestionKind::MultiChoice,
            ),
            vec![
                opt("morning", "Morning (8am–12pm)", "सुबह (8–12)"),
                opt("afternoon", "Afternoon (12pm–4pm)", "दोपहर (12–4)"),
                opt("evening", "Evening (4pm–8pm)", "शाम (4–8)"),
                opt(
                    "weekend",
                    "Weekend availability important",
                    "वीकेंड पर खुला होना ज़रूरी",
                ),
            ],
        ),
        with_options(
            question(
                "health_sessions",
                Some(10),
                bi(
                    "Would you like community health awareness sessions?",
                    "क्या आप मुफ्त सामुदायिक स्वास्थ्य जागरूकता सत्र चाहेंगे?",
                ),
                QuestionKind::Choice,
            ),
            yes_no(),
        ),
        text("health_topics", bi("Topics of interest", "रुचि के विषय")),
        text("feedback", bi("Feedback & Suggestions", "सुझाव और प्रतिक्रिया")),
        with_options(
            question(
                "follow_up",
                None,
                bi("Follow-up Preference", "फॉलो-अप प्राथमिकता"),
                QuestionKind::Choice,
            ),
            vec![
                opt("phone", "Phone", "फोन"),
                opt_en("whatsapp", "WhatsApp"),
                opt("no", "No", "नहीं"),
            ],
        ),
    ];
    questions.push(ask_when(text("phone", bi("Phone", "फोन")), "follow_up", "phone"));
    questions.push(ask_when(
        text("whatsapp", BilingualText::english("WhatsApp")),
        "follow_up",
        "whatsapp",
    ));
    questions.push(with_options(
        question(
            "satisfaction",
            None,
            bi(
                "Overall satisfaction with local healthcare today",
                "आज के स्थानीय स्वास्थ्य सेवाओं से समग्र संतुष्टि",
            ),
            QuestionKind::Rating,
        ),
        ratings(),
    ));

    OptionCatalog {
        id: "wellness-intake".to_string(),
        title: bi(
            "Preventive Healthcare & Wellness Centre",
            "निवारक स्वास्थ्य और कल्याण केंद्र",
        ),
        version: "1.0.0".to_string(),
        questions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::{ScalarField, SetField};

    #[test]
    fn builtin_covers_every_answer_field() {
        let catalog = OptionCatalog::builtin();
        for field in ScalarField::ALL {
            assert!(catalog.question(field.key()).is_some(), "missing {field}");
        }
        for field in SetField::ALL {
            assert!(catalog.question(field.key()).is_some(), "missing {field}");
        }
        assert_eq!(
            catalog
                .question(SERVICES_NEEDED)
                .map(|question| question.options.len()),
            Some(Service::ALL.len())
        );
    }

    #[test]
    fn required_questions_match_answer_model() {
        let required = OptionCatalog::builtin().required_ids().collect::<Vec<_>>();
        let expected = ScalarField::REQUIRED
            .iter()
            .map(|field| field.key())
            .collect::<Vec<_>>();
        assert_eq!(required, expected);
    }

    #[test]
    fn unknown_values_resolve_to_raw_text() {
        let catalog = OptionCatalog::builtin();
        assert_eq!(
            catalog.label_or_raw("use_wellness_centre", "maybe", Locale::Bilingual),
            "Maybe / शायद"
        );
        assert_eq!(
            catalog.label_or_raw("use_wellness_centre", "perhaps", Locale::Bilingual),
            "perhaps"
        );
    }
}
