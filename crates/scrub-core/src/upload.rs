//! Client-side guards for document uploads. Everything here runs before a
//! single byte goes on the wire: an oversized or wrong-typed file is a
//! validation failure, never a transport one.

use std::path::Path;

use crate::error::{ScrubError, ValidationError};

/// Upload ceiling enforced client-side. The backend applies the same limit.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Document types the backend can extract text from.
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["docx", "pdf"];

/// A file that passed preflight and is ready to be attached to a multipart
/// form.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub extension: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Validate and read a document for upload.
pub async fn prepare_upload(path: &Path) -> Result<UploadFile, ScrubError> {
    let extension = check_extension(file_extension(path).as_deref())?;

    let metadata = tokio::fs::metadata(path).await?;
    check_size(metadata.len(), MAX_UPLOAD_BYTES)?;

    let raw_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            ValidationError::InvalidFilename(path.display().to_string())
        })?;
    let filename = sanitize_filename(raw_name, &extension);
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    let bytes = tokio::fs::read(path).await?;

    Ok(UploadFile {
        filename,
        extension,
        mime_type,
        bytes,
    })
}

/// Lowercased extension of a path, if it has one.
pub fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

pub fn check_extension(extension: Option<&str>) -> Result<String, ValidationError> {
    let allowed = || {
        ALLOWED_EXTENSIONS
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(", ")
    };
    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext) => Ok(ext.to_string()),
        Some(ext) => Err(ValidationError::UnsupportedFileType {
            extension: format!(".{}", ext),
            allowed: allowed(),
        }),
        None => Err(ValidationError::UnsupportedFileType {
            extension: "(none)".to_string(),
            allowed: allowed(),
        }),
    }
}

pub fn check_size(actual: u64, limit: u64) -> Result<(), ValidationError> {
    if actual > limit {
        return Err(ValidationError::FileTooLarge { actual, limit });
    }
    Ok(())
}

/// Keep only the final path component with filesystem-hostile characters
/// stripped, so an upload never leaks local directory structure.
pub fn sanitize_filename(name: &str, extension: &str) -> String {
    let mut sanitized = name.to_string();
    for dangerous in ['/', '\\', '\0'] {
        sanitized = sanitized.replace(dangerous, "_");
    }
    sanitized = sanitized.replace("..", "_");

    let sanitized = sanitized
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(*c, '.' | '_' | '-'))
        .collect::<String>();

    if sanitized.is_empty() || sanitized.len() > 255 {
        format!("document.{}", extension)
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_file_extension() {
        assert_eq!(
            file_extension(&PathBuf::from("chart.PDF")),
            Some("pdf".to_string())
        );
        assert_eq!(
            file_extension(&PathBuf::from("notes.docx")),
            Some("docx".to_string())
        );
        assert_eq!(file_extension(&PathBuf::from("README")), None);
    }

    #[test]
    fn test_check_extension() {
        assert!(check_extension(Some("pdf")).is_ok());
        assert!(check_extension(Some("docx")).is_ok());

        let err = check_extension(Some("exe")).unwrap_err();
        assert!(err.to_string().contains(".exe"));
        assert!(err.to_string().contains(".docx, .pdf"));

        assert!(check_extension(None).is_err());
    }

    #[test]
    fn test_check_size() {
        assert!(check_size(MAX_UPLOAD_BYTES, MAX_UPLOAD_BYTES).is_ok());
        let err = check_size(MAX_UPLOAD_BYTES + 1, MAX_UPLOAD_BYTES).unwrap_err();
        assert!(matches!(err, ValidationError::FileTooLarge { .. }));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("chart.pdf", "pdf"), "chart.pdf");
        assert_eq!(
            sanitize_filename("../../etc/passwd.pdf", "pdf"),
            "_etcpasswd.pdf"
        );
        assert_eq!(sanitize_filename("week 3 notes.docx", "docx"), "week3notes.docx");
        assert_eq!(sanitize_filename("///", "pdf"), "document.pdf");
    }

    #[tokio::test]
    async fn test_prepare_upload_accepts_small_pdf() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("visit summary.pdf");
        std::fs::File::create(&path)
            .and_then(|mut f| f.write_all(b"%PDF-1.4 test"))
            .expect("write");

        let upload = prepare_upload(&path).await.expect("preflight");
        assert_eq!(upload.filename, "visitsummary.pdf");
        assert_eq!(upload.extension, "pdf");
        assert_eq!(upload.mime_type, "application/pdf");
        assert_eq!(upload.bytes, b"%PDF-1.4 test");
    }

    #[tokio::test]
    async fn test_prepare_upload_rejects_wrong_type() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "plain text").expect("write");

        let err = prepare_upload(&path).await.unwrap_err();
        assert!(matches!(
            err,
            ScrubError::Validation(ValidationError::UnsupportedFileType { .. })
        ));
    }

    #[tokio::test]
    async fn test_prepare_upload_rejects_oversized_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("huge.pdf");
        let bytes = vec![0u8; (MAX_UPLOAD_BYTES + 1) as usize];
        std::fs::write(&path, &bytes).expect("write");

        let err = prepare_upload(&path).await.unwrap_err();
        assert!(matches!(
            err,
            ScrubError::Validation(ValidationError::FileTooLarge { .. })
        ));
    }
}
