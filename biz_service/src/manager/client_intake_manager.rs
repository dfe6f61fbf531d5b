use crate::biz_services::client_file_service::ClientFileService;
use crate::biz_services::client_service::ClientService;
use crate::biz_services::client_service_link_service::ClientServiceLinkService;
use crate::biz_services::file_service::{FileService, KeyClock};
use crate::biz_services::payment_service::PaymentService;
use crate::entitys::client_entity::NewClient;
use crate::entitys::client_file_entity::NewClientFile;
use crate::entitys::file_entity::UploadedFile;
use crate::entitys::payment_entity::NewPayment;
use crate::manager::compensation::CompensatingTx;
use common::config::ServerRes;
use common::errors::AppError;
use common::storage::BlobGateway;
use common::{ClientId, GatewayError, RowGateway};
use log::{error, info};
use std::fmt;
use std::sync::Arc;

/// Payment part of the intake form.
#[derive(Debug, Clone, Default)]
pub struct PaymentDraft {
    pub receiver_account: Option<String>,
    pub total_amount: f64,
    pub deposit_amount: f64,
    pub screenshot: Option<UploadedFile>,
}

/// A validated intake form, ready to be written.
#[derive(Debug, Clone, Default)]
pub struct ClientIntake {
    pub client: NewClient,
    pub service_ids: Vec<String>,
    pub files: Vec<UploadedFile>,
    pub payment: PaymentDraft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeStep {
    CreateClient,
    LinkServices,
    UploadFile(String),
    RecordFile(String),
    UploadPaymentScreenshot,
    RecordPayment,
}

impl fmt::Display for IntakeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntakeStep::CreateClient => f.write_str("Failed to create client"),
            IntakeStep::LinkServices => f.write_str("Failed to link services"),
            IntakeStep::UploadFile(name) => write!(f, "Failed to upload file {name}"),
            IntakeStep::RecordFile(name) => write!(f, "Failed to record file {name}"),
            IntakeStep::UploadPaymentScreenshot => f.write_str("Failed to upload payment screenshot"),
            IntakeStep::RecordPayment => f.write_str("Failed to record payment"),
        }
    }
}

#[derive(Debug)]
pub struct StepFailure {
    pub step: IntakeStep,
    pub client_id: Option<String>,
    pub source: GatewayError,
}

impl From<StepFailure> for AppError {
    fn from(f: StepFailure) -> Self {
        AppError::UpstreamWrite { step: f.step.to_string(), client_id: f.client_id, source: f.source }
    }
}

fn failed_at(step: IntakeStep, client_id: Option<&str>) -> impl FnOnce(GatewayError) -> StepFailure {
    let client_id = client_id.map(str::to_string);
    move |source| StepFailure { step, client_id, source }
}

/// Runs the client-creation sequence:
/// client row, service links, files (blob then row), payment.
///
/// Undo entries for every step after the client insert are registered before
/// the remote call, keyed by values known up front, so a write that timed out
/// on our side but landed remotely is still removed by the unwind.
pub struct ClientIntakeManager {
    rows: Arc<dyn RowGateway>,
    blobs: Arc<dyn BlobGateway>,
    client_service: ClientService,
    link_service: ClientServiceLinkService,
    client_file_service: ClientFileService,
    payment_service: PaymentService,
    file_service: FileService,
    max_files: usize,
}

impl ClientIntakeManager {
    pub fn new(db_res: ServerRes, max_files: usize) -> Self {
        Self {
            rows: db_res.rows.clone(),
            blobs: db_res.blobs.clone(),
            client_service: ClientService::new(db_res.clone()),
            link_service: ClientServiceLinkService::new(db_res.clone()),
            client_file_service: ClientFileService::new(db_res.clone()),
            payment_service: PaymentService::new(db_res.clone()),
            file_service: FileService::new(db_res),
            max_files,
        }
    }

    /// Creates the client and everything attached to it. Returns the new
    /// client id. On failure every completed effect is undone before the
    /// step error is returned.
    pub async fn create_client(&self, intake: ClientIntake) -> Result<ClientId, AppError> {
        if intake.files.len() > self.max_files {
            return Err(AppError::Validation(format!("At most {} files are allowed", self.max_files)));
        }

        let mut tx = CompensatingTx::begin(self.rows.clone(), self.blobs.clone());
        match self.run_steps(&mut tx, &intake).await {
            Ok(client_id) => {
                let kept = tx.commit();
                info!(
                    "client {} created by {}: {} services, {} files, {} effects",
                    client_id,
                    intake.client.inserted_by,
                    intake.service_ids.len(),
                    intake.files.len(),
                    kept
                );
                Ok(client_id)
            }
            Err(failure) => {
                error!(
                    "client intake failed at [{}] client_id={:?} inserted_by={}: {}",
                    failure.step, failure.client_id, intake.client.inserted_by, failure.source
                );
                let report = tx.rollback().await;
                if !report.is_clean() {
                    error!(
                        "client_id={:?}: {} of {} undo actions failed, orphaned records need manual cleanup",
                        failure.client_id,
                        report.failed.len(),
                        report.attempted
                    );
                }
                Err(failure.into())
            }
        }
    }

    async fn run_steps(&self, tx: &mut CompensatingTx, intake: &ClientIntake) -> Result<ClientId, StepFailure> {
        let client = self.client_service.create(&intake.client).await.map_err(failed_at(IntakeStep::CreateClient, None))?;
        let client_id = client.id;
        tx.set_label(client_id.clone());
        tx.track_rows(ClientService::TABLE, "id", &client_id);

        if !intake.service_ids.is_empty() {
            tx.track_rows(ClientServiceLinkService::TABLE, "client_id", &client_id);
            self.link_service
                .link(&client_id, &intake.service_ids)
                .await
                .map_err(failed_at(IntakeStep::LinkServices, Some(&client_id)))?;
        }

        let mut clock = KeyClock::default();
        let bucket = self.file_service.bucket.clone();
        for file in &intake.files {
            let key = FileService::client_file_key(&client_id, clock.next(), &file.file_name);
            tx.track_blob(&bucket, &key);
            let file_url = self
                .file_service
                .upload(&key, file)
                .await
                .map_err(failed_at(IntakeStep::UploadFile(file.file_name.clone()), Some(&client_id)))?;

            tx.track_rows(ClientFileService::TABLE, "file_url", &file_url);
            let record = NewClientFile {
                client_id: client_id.clone(),
                label: file.file_name.clone(),
                file_url,
                mime_type: file.content_type.clone(),
                file_size: file.size(),
            };
            self.client_file_service
                .record(&record)
                .await
                .map_err(failed_at(IntakeStep::RecordFile(file.file_name.clone()), Some(&client_id)))?;
        }

        let payment = &intake.payment;
        if payment.total_amount > 0.0 {
            let screenshot_url = match &payment.screenshot {
                Some(shot) => {
                    let key = FileService::payment_screenshot_key(&client_id, clock.next(), &shot.file_name);
                    tx.track_blob(&bucket, &key);
                    let url = self
                        .file_service
                        .upload(&key, shot)
                        .await
                        .map_err(failed_at(IntakeStep::UploadPaymentScreenshot, Some(&client_id)))?;
                    Some(url)
                }
                None => None,
            };

            tx.track_rows(PaymentService::TABLE, "client_id", &client_id);
            let record = NewPayment {
                client_id: client_id.clone(),
                receiver_account: payment.receiver_account.clone().unwrap_or_default(),
                total_amount: payment.total_amount,
                deposit_amount: payment.deposit_amount,
                payment_screenshot: screenshot_url,
            };
            self.payment_service.record(&record).await.map_err(failed_at(IntakeStep::RecordPayment, Some(&client_id)))?;
        }

        Ok(client_id)
    }
}
