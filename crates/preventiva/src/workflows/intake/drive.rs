use std::io::Cursor;

use google_drive3::{api::File, api::Scope, DriveHub};
use tokio::runtime::Runtime;

use super::repository::{DocumentError, DocumentGateway, DocumentRef, PatientDocument};

/// Thin wrapper around the generated google-drive3 client allowing synchronous
/// workflows to archive documents without exposing async details.
pub struct GoogleDriveClient<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    hub: DriveHub<C>,
    runtime: Runtime,
}

impl<C> GoogleDriveClient<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    pub fn new(hub: DriveHub<C>, runtime: Runtime) -> Self {
        Self { hub, runtime }
    }

    pub fn with_runtime(hub: DriveHub<C>) -> Result<Self, DocumentError> {
        let runtime = Runtime::new().map_err(|err| DocumentError::Unavailable(err.to_string()))?;
        Ok(Self::new(hub, runtime))
    }

    fn map_error<E: std::fmt::Display>(err: E) -> DocumentError {
        DocumentError::Backend(err.to_string())
    }
}

impl<C> std::fmt::Debug for GoogleDriveClient<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleDriveClient").finish_non_exhaustive()
    }
}

impl<C> DocumentGateway for GoogleDriveClient<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    fn upload(
        &self,
        folder_id: Option<&str>,
        document: &PatientDocument,
    ) -> Result<DocumentRef, DocumentError> {
        let metadata = File {
            name: Some(document.file_name.clone()),
            parents: folder_id.map(|parent| vec![parent.to_string()]),
            ..File::default()
        };

        let media_type = document
            .content_type
            .parse::<mime::Mime>()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);
        let cursor = Cursor::new(document.bytes.clone());

        let result = self.runtime.block_on(async {
            self.hub
                .files()
                .create(metadata)
                .param("fields", "id,webViewLink")
                .supports_all_drives(true)
                .add_scope(Scope::File)
                .upload(cursor, media_type)
                .await
        });

        let (_, file) = result.map_err(GoogleDriveClient::<C>::map_error)?;
        Ok(DocumentRef {
            file_id: file.id.unwrap_or_default(),
            web_view_link: file.web_view_link,
        })
    }
}
