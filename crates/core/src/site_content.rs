//! Typed schema for the site content keys.
//!
//! Plain text keys are described by a [`TextKey`] constant carrying its
//! default copy. JSON list keys are bound to a record type implementing
//! [`ContentList`], which owns the key name, the built-in defaults and the
//! per-record validation.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::validation::{require_non_empty, validate_optional_url};

// ---------------------------------------------------------------------------
// Text keys
// ---------------------------------------------------------------------------

/// A plain text content key with its built-in default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextKey {
    pub key: &'static str,
    pub default: &'static str,
}

pub const HERO_TITLE: TextKey = TextKey {
    key: "hero_title",
    default: "Saúde integrada para toda a família",
};

pub const HERO_SUBTITLE: TextKey = TextKey {
    key: "hero_subtitle",
    default: "Especialistas, exames e acompanhamento em um só lugar.",
};

pub const ABOUT_TEXT: TextKey = TextKey {
    key: "about_text",
    default: "Há mais de 20 anos oferecemos atendimento humanizado com \
              tecnologia de ponta e profissionais qualificados.",
};

pub const CONTACT_PHONE: TextKey = TextKey {
    key: "contact_phone",
    default: "(11) 3000-0000",
};

pub const CONTACT_WHATSAPP: TextKey = TextKey {
    key: "contact_whatsapp",
    default: "(11) 90000-0000",
};

pub const CONTACT_EMAIL: TextKey = TextKey {
    key: "contact_email",
    default: "contato@clinica.com.br",
};

pub const CONTACT_ADDRESS: TextKey = TextKey {
    key: "contact_address",
    default: "Av. Paulista, 1000 - São Paulo, SP",
};

pub const CONTACT_HOURS: TextKey = TextKey {
    key: "contact_hours",
    default: "Segunda a sexta, 7h às 19h. Sábados, 7h às 12h.",
};

// ---------------------------------------------------------------------------
// List keys
// ---------------------------------------------------------------------------

/// A record type stored as a JSON array under a single content key.
pub trait ContentList:
    Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// Content key holding the serialized list.
    const KEY: &'static str;

    /// Human-readable name used in error messages and logs.
    const LABEL: &'static str;

    /// Built-in list used when the key is absent, malformed or empty.
    fn defaults() -> Vec<Self>;

    /// Validate a single record before it is persisted.
    fn validate(&self) -> Result<(), CoreError>;

    /// Storage URLs referenced by this record.
    fn image_urls(&self) -> Vec<&str> {
        Vec::new()
    }
}

/// A question/answer pair shown in the FAQ accordion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    fn new(question: &str, answer: &str) -> Self {
        Self {
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }
}

impl ContentList for FaqEntry {
    const KEY: &'static str = "faq_data";
    const LABEL: &'static str = "FAQ entry";

    fn defaults() -> Vec<Self> {
        vec![
            FaqEntry::new(
                "Quais convênios são aceitos?",
                "Atendemos os principais convênios do mercado. Consulte a lista \
                 completa na seção Convênios ou fale com a nossa recepção.",
            ),
            FaqEntry::new(
                "Como agendar uma consulta?",
                "Você pode agendar pelo telefone, pelo WhatsApp ou presencialmente \
                 em qualquer uma das nossas unidades.",
            ),
            FaqEntry::new(
                "Preciso de pedido médico para realizar exames?",
                "A maioria dos exames exige pedido médico. Traga também um \
                 documento com foto e a carteirinha do convênio.",
            ),
            FaqEntry::new(
                "Qual o horário de funcionamento?",
                "De segunda a sexta, das 7h às 19h, e aos sábados, das 7h às 12h.",
            ),
            FaqEntry::new(
                "Como recebo o resultado dos meus exames?",
                "Os resultados ficam disponíveis on-line ou podem ser retirados na \
                 unidade onde o exame foi realizado.",
            ),
        ]
    }

    fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("question", &self.question)?;
        require_non_empty("answer", &self.answer)
    }
}

/// A photographed space of the clinic shown in the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GallerySpace {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ContentList for GallerySpace {
    const KEY: &'static str = "gallery_spaces";
    const LABEL: &'static str = "Gallery space";

    fn defaults() -> Vec<Self> {
        [
            ("Recepção", "Ambiente acolhedor e climatizado."),
            ("Consultórios", "Salas amplas e equipadas."),
            ("Centro de diagnóstico", "Equipamentos de imagem de última geração."),
        ]
        .into_iter()
        .map(|(title, description)| GallerySpace {
            title: title.to_string(),
            description: description.to_string(),
            image_url: None,
        })
        .collect()
    }

    fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("title", &self.title)?;
        validate_optional_url("image_url", self.image_url.as_deref())
    }

    fn image_urls(&self) -> Vec<&str> {
        self.image_url.as_deref().into_iter().collect()
    }
}

/// An exam offered by the clinic, optionally tied to an institute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Slug of the institute performing the exam.
    #[serde(default)]
    pub institute: Option<String>,
}

impl ContentList for ExamEntry {
    const KEY: &'static str = "exams_data";
    const LABEL: &'static str = "Exam";

    fn defaults() -> Vec<Self> {
        [
            ("Hemograma completo", "Avaliação geral das células do sangue."),
            ("Ultrassonografia", "Exame de imagem sem radiação."),
            ("Eletrocardiograma", "Registro da atividade elétrica do coração."),
        ]
        .into_iter()
        .map(|(name, description)| ExamEntry {
            name: name.to_string(),
            description: description.to_string(),
            institute: None,
        })
        .collect()
    }

    fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("name", &self.name)
    }
}

/// An accepted insurance provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvenioEntry {
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl ContentList for ConvenioEntry {
    const KEY: &'static str = "convenios_data";
    const LABEL: &'static str = "Convenio";

    fn defaults() -> Vec<Self> {
        ["Amil", "Bradesco Saúde", "SulAmérica", "Unimed"]
            .into_iter()
            .map(|name| ConvenioEntry {
                name: name.to_string(),
                logo_url: None,
            })
            .collect()
    }

    fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("name", &self.name)?;
        validate_optional_url("logo_url", self.logo_url.as_deref())
    }

    fn image_urls(&self) -> Vec<&str> {
        self.logo_url.as_deref().into_iter().collect()
    }
}
