/// Kind of content uploaded for a run, keyed by input template tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
    Tif,
    Jpg,
    Png,
    Gif,
    /// PDF containing scanned page images
    PdfImages,
    /// PDF with an embedded text layer
    PdfText,
    Djvu,
    /// Post-OCR plain text
    TextOcr,
    /// FoLiA documents that already carry an OCR text layer
    FoliaOcr,
}

/// Document format a stage hands to the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Folia,
    Text,
    Pdf,
}

impl DocumentFormat {
    /// Value of the `--inputtype` / `--inputformat` flags
    pub fn flag(self) -> &'static str {
        match self {
            DocumentFormat::Folia => "folia",
            DocumentFormat::Text => "text",
            DocumentFormat::Pdf => "pdf",
        }
    }

    /// File extension the pipelines look for
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Folia => "folia.xml",
            DocumentFormat::Text => "txt",
            DocumentFormat::Pdf => "pdf",
        }
    }
}

impl InputType {
    /// Look up an input template tag in the allow-list
    pub fn from_template(tag: &str) -> Option<Self> {
        match tag {
            "tif" => Some(InputType::Tif),
            "jpg" => Some(InputType::Jpg),
            "png" => Some(InputType::Png),
            "gif" => Some(InputType::Gif),
            "pdfimages" => Some(InputType::PdfImages),
            "pdftext" => Some(InputType::PdfText),
            "djvu" => Some(InputType::Djvu),
            "textocr" => Some(InputType::TextOcr),
            "foliaocr" => Some(InputType::FoliaOcr),
            _ => None,
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            InputType::Tif => "tif",
            InputType::Jpg => "jpg",
            InputType::Png => "png",
            InputType::Gif => "gif",
            InputType::PdfImages => "pdfimages",
            InputType::PdfText => "pdftext",
            InputType::Djvu => "djvu",
            InputType::TextOcr => "textocr",
            InputType::FoliaOcr => "foliaocr",
        }
    }

    /// Raw page images have to go through OCR first
    pub fn requires_ocr(self) -> bool {
        !matches!(
            self,
            InputType::PdfText | InputType::TextOcr | InputType::FoliaOcr
        )
    }

    /// Format of the uploaded documents when OCR is skipped
    pub fn document_format(self) -> DocumentFormat {
        match self {
            InputType::TextOcr => DocumentFormat::Text,
            InputType::PdfText => DocumentFormat::Pdf,
            _ => DocumentFormat::Folia,
        }
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.template())
    }
}
