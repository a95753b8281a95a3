//! Built-in message table and display languages.
//!
//! Messages may contain `{name}` placeholders filled by [`Language::format`].
//! A placeholder whose value is empty is removed together with a `": "`
//! in front of it, so `"File not found: {field}"` renders as
//! `"File not found"` without a value.

use std::fmt;

use imp_client::{ErrorKey, match_error};

/// Supported display languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Turkish,
    English,
    German,
    French,
    Spanish,
    Arabic,
}

pub const DEFAULT_LANGUAGE: Language = Language::Turkish;

impl Language {
    pub const ALL: [Language; 6] = [
        Language::Turkish,
        Language::English,
        Language::German,
        Language::French,
        Language::Spanish,
        Language::Arabic,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::Turkish => "tr",
            Language::English => "en",
            Language::German => "de",
            Language::French => "fr",
            Language::Spanish => "es",
            Language::Arabic => "ar",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::Turkish => "Turkish",
            Language::English => "English",
            Language::German => "German",
            Language::French => "French",
            Language::Spanish => "Spanish",
            Language::Arabic => "Arabic",
        }
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            Language::Turkish => "Türkçe",
            Language::English => "English",
            Language::German => "Deutsch",
            Language::French => "Français",
            Language::Spanish => "Español",
            Language::Arabic => "العربية",
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Arabic)
    }

    /// Parses `en`, `EN`, `en-US` or `en_US.UTF-8`.
    pub fn from_code(code: &str) -> Option<Language> {
        let primary = code
            .trim()
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        Language::ALL.into_iter().find(|l| l.code() == primary)
    }

    /// Language from the `LC_ALL`/`LANG` environment, if supported.
    pub fn from_env() -> Option<Language> {
        ["LC_ALL", "LANG"]
            .into_iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|value| Language::from_code(&value))
    }

    pub fn text(&self, message: Message) -> &'static str {
        let table = match self {
            Language::Turkish => &TR,
            Language::English => &EN,
            Language::German => &DE,
            Language::French => &FR,
            Language::Spanish => &ES,
            Language::Arabic => &AR,
        };
        table[message as usize]
    }

    /// Looks up `message` and fills its placeholders.
    pub fn format(&self, message: Message, args: &[(&str, &str)]) -> String {
        fill(self.text(message), args)
    }

    /// Rewrites a backend error into this language, or returns it unchanged
    /// when the phrase is not recognized.
    pub fn translate_error(&self, raw: &str) -> String {
        if raw.trim().is_empty() {
            return self.text(Message::UnknownError).to_string();
        }
        let Some(matched) = match_error(raw) else {
            return raw.to_string();
        };
        let value = matched.value.as_str();
        self.format(
            Message::from(matched.key),
            &[
                ("externalId", value),
                ("email", value),
                ("phone", value),
                ("field", value),
                ("message", value),
                ("fields", matched.fields.as_str()),
            ],
        )
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.native_name(), self.code())
    }
}

fn fill(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in args {
        let placeholder = format!("{{{name}}}");
        if value.is_empty() {
            out = out.replace(&format!(": {placeholder}"), "");
        }
        out = out.replace(&placeholder, value);
    }
    out
}

/// Keys of the built-in message table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    StepUpload,
    StepPreview,
    StepMapping,
    StepSummary,
    StepResult,
    RequiredCoverage,
    MissingRequired,
    NoFieldsMapped,
    ImportSucceeded,
    ImportFinishedWithErrors,
    ImportSubmitted,
    TicketCreated,
    MappingSaved,
    TemplateSaved,
    DuplicateTarget,
    ExternalIdExists,
    EmailExists,
    InvalidEmail,
    PhoneExists,
    InvalidPhone,
    RequiredField,
    DuplicateRecord,
    ValidationError,
    NetworkError,
    ServerError,
    TimeoutError,
    FileNotFound,
    InvalidFileType,
    FileTooLarge,
    ImportFailed,
    ExportFailed,
    PermissionDenied,
    Unauthorized,
    Forbidden,
    AtLeastOneFieldRequired,
    UnknownError,
}

const MESSAGE_COUNT: usize = Message::UnknownError as usize + 1;

impl From<ErrorKey> for Message {
    fn from(key: ErrorKey) -> Self {
        match key {
            ErrorKey::ExternalIdExists => Message::ExternalIdExists,
            ErrorKey::EmailExists => Message::EmailExists,
            ErrorKey::InvalidEmail => Message::InvalidEmail,
            ErrorKey::PhoneExists => Message::PhoneExists,
            ErrorKey::InvalidPhone => Message::InvalidPhone,
            ErrorKey::RequiredField => Message::RequiredField,
            ErrorKey::DuplicateRecord => Message::DuplicateRecord,
            ErrorKey::ValidationError => Message::ValidationError,
            ErrorKey::NetworkError => Message::NetworkError,
            ErrorKey::ServerError => Message::ServerError,
            ErrorKey::TimeoutError => Message::TimeoutError,
            ErrorKey::FileNotFound => Message::FileNotFound,
            ErrorKey::InvalidFileType => Message::InvalidFileType,
            ErrorKey::FileTooLarge => Message::FileTooLarge,
            ErrorKey::ImportFailed => Message::ImportFailed,
            ErrorKey::ExportFailed => Message::ExportFailed,
            ErrorKey::PermissionDenied => Message::PermissionDenied,
            ErrorKey::Unauthorized => Message::Unauthorized,
            ErrorKey::Forbidden => Message::Forbidden,
            ErrorKey::AtLeastOneFieldRequired => Message::AtLeastOneFieldRequired,
        }
    }
}

// Rows follow the declaration order of `Message`.

static TR: [&str; MESSAGE_COUNT] = [
    "Dosya Yükle",
    "Önizleme",
    "Eşleştirme",
    "Özet",
    "Sonuç",
    "Zorunlu alanlar: {covered}/{total} (%{percent})",
    "Eşleştirilmemiş zorunlu alanlar: {fields}",
    "Hiçbir alan eşleştirilmedi",
    "İçe aktarma tamamlandı: {success}/{total} kayıt",
    "İçe aktarma hatalarla tamamlandı: {errors} hatalı kayıt",
    "İçe aktarma gönderildi: {total} kayıt",
    "Talep oluşturuldu: {id}",
    "Eşleştirme dosyası kaydedildi: {path}",
    "Şablon kaydedildi: {name}",
    "'{field}' alanı birden fazla sütuna eşlendi: {columns}",
    "Harici ID zaten mevcut: {externalId}",
    "E-posta adresi zaten mevcut: {email}",
    "Geçersiz e-posta adresi: {email}",
    "Telefon numarası zaten mevcut: {phone}",
    "Geçersiz telefon numarası: {phone}",
    "Zorunlu alan eksik: {field}",
    "Kayıt zaten mevcut",
    "Doğrulama hatası: {message}",
    "Ağ hatası. Lütfen bağlantınızı kontrol edin.",
    "Sunucu hatası. Lütfen daha sonra tekrar deneyin.",
    "İstek zaman aşımına uğradı.",
    "Dosya bulunamadı",
    "Geçersiz dosya türü",
    "Dosya çok büyük",
    "İçe aktarma başarısız oldu",
    "Dışa aktarma başarısız oldu",
    "İzin reddedildi",
    "Yetkisiz erişim",
    "Erişim engellendi",
    "Bu alanlardan en az biri zorunludur: {fields}",
    "Bilinmeyen hata",
];

static EN: [&str; MESSAGE_COUNT] = [
    "Upload",
    "Preview",
    "Mapping",
    "Summary",
    "Result",
    "Required fields: {covered}/{total} ({percent}%)",
    "Unmapped required fields: {fields}",
    "No fields mapped",
    "Import finished: {success}/{total} records",
    "Import finished with errors: {errors} failed records",
    "Import submitted: {total} rows",
    "Ticket created: {id}",
    "Mapping file saved: {path}",
    "Template saved: {name}",
    "Field '{field}' is mapped from more than one column: {columns}",
    "External ID already exists: {externalId}",
    "Email address already exists: {email}",
    "Invalid email address: {email}",
    "Phone number already exists: {phone}",
    "Invalid phone number: {phone}",
    "Required field missing: {field}",
    "Duplicate record",
    "Validation error: {message}",
    "Network error. Please check your connection.",
    "Server error. Please try again later.",
    "The request timed out.",
    "File not found",
    "Invalid file type",
    "File too large",
    "Import failed",
    "Export failed",
    "Permission denied",
    "Unauthorized",
    "Forbidden",
    "At least one of these fields is required: {fields}",
    "Unknown error",
];

static DE: [&str; MESSAGE_COUNT] = [
    "Hochladen",
    "Vorschau",
    "Zuordnung",
    "Zusammenfassung",
    "Ergebnis",
    "Pflichtfelder: {covered}/{total} ({percent}%)",
    "Nicht zugeordnete Pflichtfelder: {fields}",
    "Keine Felder zugeordnet",
    "Import abgeschlossen: {success}/{total} Datensätze",
    "Import mit Fehlern abgeschlossen: {errors} fehlerhafte Datensätze",
    "Import übermittelt: {total} Zeilen",
    "Ticket erstellt: {id}",
    "Zuordnungsdatei gespeichert: {path}",
    "Vorlage gespeichert: {name}",
    "Feld '{field}' ist mehreren Spalten zugeordnet: {columns}",
    "Externe ID existiert bereits: {externalId}",
    "E-Mail-Adresse existiert bereits: {email}",
    "Ungültige E-Mail-Adresse: {email}",
    "Telefonnummer existiert bereits: {phone}",
    "Ungültige Telefonnummer: {phone}",
    "Pflichtfeld fehlt: {field}",
    "Doppelter Datensatz",
    "Validierungsfehler: {message}",
    "Netzwerkfehler. Bitte prüfen Sie Ihre Verbindung.",
    "Serverfehler. Bitte versuchen Sie es später erneut.",
    "Zeitüberschreitung der Anfrage.",
    "Datei nicht gefunden",
    "Ungültiger Dateityp",
    "Datei zu groß",
    "Import fehlgeschlagen",
    "Export fehlgeschlagen",
    "Zugriff verweigert",
    "Nicht autorisiert",
    "Verboten",
    "Mindestens eines dieser Felder ist erforderlich: {fields}",
    "Unbekannter Fehler",
];

static FR: [&str; MESSAGE_COUNT] = [
    "Téléversement",
    "Aperçu",
    "Correspondance",
    "Résumé",
    "Résultat",
    "Champs obligatoires : {covered}/{total} ({percent} %)",
    "Champs obligatoires non associés: {fields}",
    "Aucun champ associé",
    "Import terminé : {success}/{total} enregistrements",
    "Import terminé avec des erreurs : {errors} enregistrements en échec",
    "Import envoyé : {total} lignes",
    "Ticket créé: {id}",
    "Fichier de correspondance enregistré: {path}",
    "Modèle enregistré: {name}",
    "Le champ '{field}' est associé à plusieurs colonnes: {columns}",
    "L'ID externe existe déjà: {externalId}",
    "L'adresse e-mail existe déjà: {email}",
    "Adresse e-mail invalide: {email}",
    "Le numéro de téléphone existe déjà: {phone}",
    "Numéro de téléphone invalide: {phone}",
    "Champ obligatoire manquant: {field}",
    "Enregistrement en double",
    "Erreur de validation: {message}",
    "Erreur réseau. Veuillez vérifier votre connexion.",
    "Erreur serveur. Veuillez réessayer plus tard.",
    "La requête a expiré.",
    "Fichier introuvable",
    "Type de fichier invalide",
    "Fichier trop volumineux",
    "Échec de l'import",
    "Échec de l'export",
    "Permission refusée",
    "Non autorisé",
    "Interdit",
    "Au moins un de ces champs est obligatoire: {fields}",
    "Erreur inconnue",
];

static ES: [&str; MESSAGE_COUNT] = [
    "Subir archivo",
    "Vista previa",
    "Asignación",
    "Resumen",
    "Resultado",
    "Campos obligatorios: {covered}/{total} ({percent}%)",
    "Campos obligatorios sin asignar: {fields}",
    "No se asignó ningún campo",
    "Importación finalizada: {success}/{total} registros",
    "Importación finalizada con errores: {errors} registros fallidos",
    "Importación enviada: {total} filas",
    "Ticket creado: {id}",
    "Archivo de asignación guardado: {path}",
    "Plantilla guardada: {name}",
    "El campo '{field}' está asignado a más de una columna: {columns}",
    "El ID externo ya existe: {externalId}",
    "La dirección de correo ya existe: {email}",
    "Dirección de correo no válida: {email}",
    "El número de teléfono ya existe: {phone}",
    "Número de teléfono no válido: {phone}",
    "Falta un campo obligatorio: {field}",
    "Registro duplicado",
    "Error de validación: {message}",
    "Error de red. Compruebe su conexión.",
    "Error del servidor. Inténtelo de nuevo más tarde.",
    "La solicitud superó el tiempo de espera.",
    "Archivo no encontrado",
    "Tipo de archivo no válido",
    "Archivo demasiado grande",
    "La importación falló",
    "La exportación falló",
    "Permiso denegado",
    "No autorizado",
    "Prohibido",
    "Se requiere al menos uno de estos campos: {fields}",
    "Error desconocido",
];

static AR: [&str; MESSAGE_COUNT] = [
    "رفع الملف",
    "معاينة",
    "المطابقة",
    "الملخص",
    "النتيجة",
    "الحقول المطلوبة: {covered}/{total} ({percent}%)",
    "حقول مطلوبة غير مطابقة: {fields}",
    "لم تتم مطابقة أي حقل",
    "اكتمل الاستيراد: {success}/{total} سجل",
    "اكتمل الاستيراد مع أخطاء: {errors} سجل فاشل",
    "تم إرسال الاستيراد: {total} صف",
    "تم إنشاء التذكرة: {id}",
    "تم حفظ ملف المطابقة: {path}",
    "تم حفظ القالب: {name}",
    "الحقل '{field}' مطابق لأكثر من عمود: {columns}",
    "المعرف الخارجي موجود بالفعل: {externalId}",
    "عنوان البريد الإلكتروني موجود بالفعل: {email}",
    "عنوان بريد إلكتروني غير صالح: {email}",
    "رقم الهاتف موجود بالفعل: {phone}",
    "رقم هاتف غير صالح: {phone}",
    "حقل مطلوب مفقود: {field}",
    "سجل مكرر",
    "خطأ في التحقق: {message}",
    "خطأ في الشبكة. يرجى التحقق من اتصالك.",
    "خطأ في الخادم. يرجى المحاولة لاحقًا.",
    "انتهت مهلة الطلب.",
    "الملف غير موجود",
    "نوع ملف غير صالح",
    "الملف كبير جدًا",
    "فشل الاستيراد",
    "فشل التصدير",
    "تم رفض الإذن",
    "غير مصرح",
    "محظور",
    "مطلوب حقل واحد على الأقل من هذه الحقول: {fields}",
    "خطأ غير معروف",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_variants() {
        assert_eq!(Language::from_code("en"), Some(Language::English));
        assert_eq!(Language::from_code("DE"), Some(Language::German));
        assert_eq!(Language::from_code("fr-CA"), Some(Language::French));
        assert_eq!(Language::from_code("es_ES.UTF-8"), Some(Language::Spanish));
        assert_eq!(Language::from_code("ja"), None);
        assert_eq!(Language::from_code(""), None);
    }

    #[test]
    fn test_only_arabic_is_rtl() {
        let rtl: Vec<_> = Language::ALL.iter().filter(|l| l.is_rtl()).collect();
        assert_eq!(rtl, vec![&Language::Arabic]);
    }

    #[test]
    fn test_translate_error_with_value() {
        assert_eq!(
            Language::English.translate_error("External ID already exists: EXT008"),
            "External ID already exists: EXT008"
        );
        assert_eq!(
            Language::Turkish.translate_error("External ID already exists: EXT008"),
            "Harici ID zaten mevcut: EXT008"
        );
        assert_eq!(
            Language::German.translate_error("email already exists"),
            "E-Mail-Adresse existiert bereits"
        );
    }

    #[test]
    fn test_translate_error_fields_list() {
        assert_eq!(
            Language::English.translate_error("At least one of these fields is required"),
            "At least one of these fields is required: firstName, externalId, email, or phone"
        );
    }

    #[test]
    fn test_translate_error_passthrough_and_empty() {
        assert_eq!(
            Language::Spanish.translate_error("Row rejected by rule R12"),
            "Row rejected by rule R12"
        );
        assert_eq!(Language::French.translate_error(""), "Erreur inconnue");
    }

    #[test]
    fn test_format_fills_placeholders() {
        let text = Language::English.format(
            Message::RequiredCoverage,
            &[("covered", "1"), ("total", "2"), ("percent", "50")],
        );
        assert_eq!(text, "Required fields: 1/2 (50%)");
    }

    #[test]
    fn test_every_language_has_every_message() {
        for language in Language::ALL {
            for message in [Message::StepUpload, Message::UnknownError] {
                assert!(!language.text(message).is_empty());
            }
        }
    }
}
