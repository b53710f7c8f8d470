//! Multipart form bodies.
//!
//! A form body is written as zero or more named text fields followed by
//! exactly one file part. The file part is always named `"file"`.

use crate::BuildError;
use reqwest::multipart::{Form, Part};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Name of the form part carrying the uploaded file.
pub const FILE_FIELD_NAME: &str = "file";

const FILE_MIME: &str = "application/octet-stream";

/// A named text field of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// The field name.
    pub name: String,
    /// The field value.
    pub value: String,
}

impl FormField {
    /// Creates a new text field.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The file part of a multipart form.
///
/// The reader is drained when the form is written, so any read failure
/// surfaces as a deferred [`BuildError::Form`] on the request builder.
///
/// # Examples
///
/// ```
/// use httpc::FormFile;
///
/// let file = FormFile::new("report.csv", &b"a,b\n1,2\n"[..]);
/// assert_eq!(file.file_name(), "report.csv");
/// ```
#[derive(Debug)]
pub struct FormFile<R> {
    file_name: String,
    reader: R,
}

impl<R: Read> FormFile<R> {
    /// Creates a file part whose content is read from `reader`.
    pub fn new(file_name: impl Into<String>, reader: R) -> Self {
        Self {
            file_name: file_name.into(),
            reader,
        }
    }

    /// The file name sent in the part's `Content-Disposition`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl FormFile<File> {
    /// Opens `path` and uses its final component as the file name.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(file_name, File::open(path)?))
    }
}

/// A fully written multipart body and the content type announcing its boundary.
#[derive(Debug)]
pub(crate) struct MultipartBody {
    pub(crate) form: Form,
    pub(crate) content_type: String,
}

/// Writes the text fields, then the file part, into a new form.
pub(crate) fn write_form<R, I>(mut file: FormFile<R>, fields: I) -> Result<MultipartBody, BuildError>
where
    R: Read,
    I: IntoIterator<Item = FormField>,
{
    let mut form = Form::new();
    for field in fields {
        form = form.text(field.name, field.value);
    }

    let mut content = Vec::new();
    file.reader
        .read_to_end(&mut content)
        .map_err(|e| BuildError::Form(format!("reading {}: {}", file.file_name, e)))?;

    let part = Part::bytes(content)
        .file_name(file.file_name)
        .mime_str(FILE_MIME)
        .map_err(|e| BuildError::Form(e.to_string()))?;
    form = form.part(FILE_FIELD_NAME, part);

    let content_type = format!("multipart/form-data; boundary={}", form.boundary());
    Ok(MultipartBody { form, content_type })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn content_type_carries_boundary() {
        let body = write_form(
            FormFile::new("example", &b"id,name\n1,a\n"[..]),
            vec![FormField::new("project_id", "123456")],
        )
        .unwrap();

        assert!(body.content_type.starts_with("multipart/form-data; boundary="));
        assert!(body.content_type.ends_with(body.form.boundary()));
    }

    #[test]
    fn read_failure_is_a_form_error() {
        let err = write_form(FormFile::new("broken", FailingReader), Vec::new()).unwrap_err();
        match err {
            BuildError::Form(message) => assert!(message.contains("disk on fire")),
            other => panic!("Expected Form error, got {:?}", other),
        }
    }

    #[test]
    fn open_uses_file_name_of_path() {
        let file = FormFile::open(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/testdata/template.csv"))
            .unwrap();
        assert_eq!(file.file_name(), "template.csv");
    }

    #[test]
    fn open_missing_file_fails_eagerly() {
        assert!(FormFile::open("/definitely/not/here.csv").is_err());
    }
}
