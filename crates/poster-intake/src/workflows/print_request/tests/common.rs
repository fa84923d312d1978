use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use image::{DynamicImage, Rgba, RgbaImage};
use lopdf::{dictionary, Document, Object};

use crate::workflows::print_request::dispatch::{
    DispatchError, DispatchGateway, DispatchPayload,
};
use crate::workflows::print_request::domain::{
    College, IntakeForm, IntakeSubmission, PosterFile, Role, SessionId, SubmissionRecord, UseCase,
};
use crate::workflows::print_request::preview::{PageRasterizer, RasterError};
use crate::workflows::print_request::service::SubmissionService;
use crate::workflows::print_request::store::{SessionStore, StoreError};

/// Minimal single-page PDF with the given MediaBox span in points.
pub(super) fn pdf_with_page(width_pt: i64, height_pt: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), width_pt.into(), height_pt.into()],
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialize test pdf");
    bytes
}

/// Single-page PDF carrying a content stream of `content_len` bytes, for
/// exercising uploads well past the default body limits.
pub(super) fn oversized_pdf(width_pt: i64, height_pt: i64, content_len: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content_id = doc.add_object(lopdf::Stream::new(dictionary! {}, vec![b' '; content_len]));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), width_pt.into(), height_pt.into()],
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialize test pdf");
    bytes
}

pub(super) fn pdf_without_pages() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => Vec::<Object>::new(),
        "Count" => 0,
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialize test pdf");
    bytes
}

pub(super) fn filled_form() -> IntakeForm {
    IntakeForm {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        college: College::FristCollegeOfMedicine.label().to_string(),
        role: Role::Student.label().to_string(),
        use_case: UseCase::StudentResearchDay.label().to_string(),
        purpose: "Research day poster on analytic engines".to_string(),
        email: "ada.lovelace@example.edu".to_string(),
    }
}

pub(super) fn landscape_submission() -> IntakeSubmission {
    IntakeSubmission {
        form: filled_form(),
        poster: Some(PosterFile {
            file_name: "analytic-engines.pdf".to_string(),
            bytes: pdf_with_page(792, 612),
        }),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    records: Arc<Mutex<HashMap<SessionId, SubmissionRecord>>>,
}

impl MemoryStore {
    pub(super) fn record(&self, id: &SessionId) -> Option<SubmissionRecord> {
        self.records.lock().expect("store mutex poisoned").get(id).cloned()
    }
}

impl SessionStore for MemoryStore {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SubmissionRecord) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(&record.session_id) {
            guard.insert(record.session_id.clone(), record);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SubmissionRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Gateway double that records payloads and fails on demand.
#[derive(Default)]
pub(super) struct RecordingGateway {
    failure: Mutex<Option<DispatchError>>,
    payloads: Mutex<Vec<DispatchPayload>>,
}

impl RecordingGateway {
    pub(super) fn set_failure(&self, error: Option<DispatchError>) {
        *self.failure.lock().expect("gateway mutex poisoned") = error;
    }

    pub(super) fn payloads(&self) -> Vec<DispatchPayload> {
        self.payloads.lock().expect("gateway mutex poisoned").clone()
    }
}

impl DispatchGateway for RecordingGateway {
    async fn dispatch(&self, payload: DispatchPayload) -> Result<(), DispatchError> {
        self.payloads
            .lock()
            .expect("gateway mutex poisoned")
            .push(payload);
        match self.failure.lock().expect("gateway mutex poisoned").clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Rasterizer double producing a solid bitmap, sized like a 72 DPI render.
pub(super) struct StubRasterizer;

impl PageRasterizer for StubRasterizer {
    fn rasterize_first_page(&self, _bytes: &[u8]) -> Result<DynamicImage, RasterError> {
        Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            16,
            12,
            Rgba([255, 255, 255, 255]),
        )))
    }
}

pub(super) type TestService = SubmissionService<MemoryStore, RecordingGateway, StubRasterizer>;

pub(super) fn build_service() -> (Arc<TestService>, Arc<MemoryStore>, Arc<RecordingGateway>) {
    let store = Arc::new(MemoryStore::default());
    let gateway = Arc::new(RecordingGateway::default());
    let service = Arc::new(SubmissionService::new(
        store.clone(),
        gateway.clone(),
        Arc::new(StubRasterizer),
    ));
    (service, store, gateway)
}
