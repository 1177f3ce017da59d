//! End-to-end session flows against a scripted signing service

#[path = "common/mock_service.rs"]
mod mock_service;
#[path = "common/pdf.rs"]
mod pdf;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use mock_service::MockService;
use pdf::pdf_with_pages;
use pretty_assertions::assert_eq;
use sign_core::{
    DisplayPoint, GestureState, PlacementKind, QuickPreset, ScaleReference, SignError,
    SignSession,
};

const STAMP: &str = "data:image/png;base64,U1RBTVA=";

fn letter_session() -> SignSession {
    let mut session = SignSession::new();
    let pages = session.load_document(pdf_with_pages(&[(612, 792)])).unwrap();
    assert_eq!(pages.len(), 1);
    session.set_preview_size(0, 600.0, 777.0).unwrap();
    session
}

#[test]
fn typed_signature_placed_and_exported() {
    let service = MockService::signing(&STANDARD.encode(b"%PDF-signed"));
    let mut session = letter_session();

    tokio_test::block_on(session.create_text_signature("  Jane Doe ", &service)).unwrap();
    assert_eq!(service.text_requests.borrow()[0].text, "Jane Doe");

    let id = session
        .add_quick_placement(QuickPreset::TopLeft, PlacementKind::Signature, 0)
        .unwrap();
    assert_eq!(
        session.placement(id).unwrap().image_data(),
        "data:image/png;base64,iVBORw0KGgo="
    );

    let signed = tokio_test::block_on(session.export(&service)).unwrap();
    assert_eq!(signed, b"%PDF-signed".to_vec());

    let requests = service.apply_requests.borrow();
    let sent = &requests[0];
    assert_eq!(STANDARD.decode(&sent.pdf_data).unwrap(), session.document_bytes().unwrap());

    let p = &sent.placements[0];
    assert_eq!((p.page, p.x, p.y, p.width, p.height), (0, 61, 40, 122, 40));
    assert_eq!(p.kind, PlacementKind::Signature);
}

#[test]
fn dragged_and_resized_placement_exports_final_geometry() {
    let service = MockService::signing(&STANDARD.encode(b"ok"));
    let mut session = letter_session();
    session.set_uploaded_asset(PlacementKind::Stamp, STAMP).unwrap();

    let id = session
        .add_quick_placement(QuickPreset::BottomCenter, PlacementKind::Stamp, 0)
        .unwrap();
    let start = session.placement(id).unwrap().position();

    assert!(session.pointer_down_body(id, DisplayPoint::new(start.x + 10.0, start.y + 5.0)));
    session.pointer_move(DisplayPoint::new(110.0, 105.0));
    session.pointer_up();
    assert_eq!(session.placement(id).unwrap().position(), DisplayPoint::new(100.0, 100.0));

    assert!(session.pointer_down_handle(id, DisplayPoint::new(190.0, 130.0)));
    session.pointer_move(DisplayPoint::new(300.0, 900.0));
    session.pointer_leave();
    assert_eq!(session.gesture_state(), GestureState::Idle);

    // 15% of 600 = 90, then +110 from the handle
    let size = session.placement(id).unwrap().size();
    assert!((size.width - 200.0).abs() < 1e-9);

    tokio_test::block_on(session.export(&service)).unwrap();
    let requests = service.apply_requests.borrow();
    let p = &requests[0].placements[0];
    assert_eq!((p.x, p.y, p.width, p.height), (102, 102, 204, 67));
    assert_eq!(p.kind, PlacementKind::Stamp);
    assert_eq!(p.data, STAMP);
}

#[test]
fn service_error_is_surfaced_verbatim_and_store_unchanged() {
    let service = MockService::rejecting(Some("Invalid signature image"));
    let mut session = letter_session();
    session.set_uploaded_asset(PlacementKind::Stamp, STAMP).unwrap();
    session
        .add_quick_placement(QuickPreset::TopRight, PlacementKind::Stamp, 0)
        .unwrap();
    let before = session.placements().to_vec();

    let err = tokio_test::block_on(session.export(&service)).unwrap_err();
    assert_eq!(err.to_string(), "Invalid signature image");
    assert!(!err.is_precondition());
    assert_eq!(session.placements(), before.as_slice());
}

#[test]
fn failure_without_message_uses_generic_text() {
    let service = MockService::rejecting(None);
    let mut session = letter_session();
    session.set_uploaded_asset(PlacementKind::Stamp, STAMP).unwrap();
    session
        .add_quick_placement(QuickPreset::TopCenter, PlacementKind::Stamp, 0)
        .unwrap();

    let err = tokio_test::block_on(session.export(&service)).unwrap_err();
    assert_eq!(err.to_string(), "Failed to sign PDF");
}

#[test]
fn transport_failure_is_reported() {
    let service = MockService::unreachable();
    let mut session = letter_session();
    session.set_uploaded_asset(PlacementKind::Stamp, STAMP).unwrap();
    session
        .add_quick_placement(QuickPreset::TopCenter, PlacementKind::Stamp, 0)
        .unwrap();

    let err = tokio_test::block_on(session.export(&service)).unwrap_err();
    assert_eq!(err.to_string(), "Failed to sign PDF: connection refused");
    assert_eq!(session.placements().len(), 1);
}

#[test]
fn export_without_placements_never_calls_service() {
    let service = MockService::signing("");
    let session = letter_session();

    let err = tokio_test::block_on(session.export(&service)).unwrap_err();
    assert_eq!(err, SignError::NothingToExport);
    assert_eq!(err.to_string(), "Please add at least one signature");
    assert!(service.apply_requests.borrow().is_empty());
}

#[test]
fn blank_name_never_calls_service() {
    let service = MockService::signing("");
    let mut session = SignSession::new();

    let err = tokio_test::block_on(session.create_text_signature("   ", &service)).unwrap_err();
    assert_eq!(err.to_string(), "Please enter your name");
    assert!(service.text_requests.borrow().is_empty());
    assert!(session.asset(PlacementKind::Signature).is_none());
}

/// Page 0 is Letter, page 1 is landscape A4; both previews are 600px wide
fn mixed_session(reference: ScaleReference) -> SignSession {
    let mut session = SignSession::with_scale_reference(reference);
    session
        .load_document(pdf_with_pages(&[(612, 792), (842, 595)]))
        .unwrap();
    session.set_preview_size(0, 600.0, 776.47).unwrap();
    session.set_preview_size(1, 600.0, 424.0).unwrap();
    session.set_uploaded_asset(PlacementKind::Stamp, STAMP).unwrap();
    session
}

#[test]
fn per_page_scale_uses_each_placements_page() {
    let mut session = mixed_session(ScaleReference::PerPage);
    session
        .add_placement(PlacementKind::Stamp, 1, DisplayPoint::new(300.0, 200.0), 100.0)
        .unwrap();

    let native = session.native_placements().unwrap();
    // 842 / 600 = 1.4033
    assert_eq!((native[0].page, native[0].x, native[0].width), (1, 421, 140));
}

#[test]
fn first_page_scale_reproduces_single_reference() {
    let mut session = mixed_session(ScaleReference::FirstPage);
    session
        .add_placement(PlacementKind::Stamp, 1, DisplayPoint::new(300.0, 200.0), 100.0)
        .unwrap();

    let native = session.native_placements().unwrap();
    // 612 / 600 = 1.02, regardless of the page the stamp is on
    assert_eq!((native[0].page, native[0].x, native[0].width), (1, 306, 102));
}

#[test]
fn first_page_scale_needs_first_preview() {
    let mut session = SignSession::with_scale_reference(ScaleReference::FirstPage);
    session
        .load_document(pdf_with_pages(&[(612, 792), (612, 792)]))
        .unwrap();
    session.set_preview_size(1, 600.0, 777.0).unwrap();
    session.set_uploaded_asset(PlacementKind::Stamp, STAMP).unwrap();
    session
        .add_quick_placement(QuickPreset::MiddleLeft, PlacementKind::Stamp, 1)
        .unwrap();

    assert_eq!(session.export_request(), Err(SignError::PreviewNotReady));
}

#[test]
fn non_pdf_bytes_are_rejected() {
    let mut session = SignSession::new();
    let err = session.load_document(b"PK\x03\x04".to_vec()).unwrap_err();
    assert!(matches!(err, SignError::Pdf(_)));
    assert!(!session.is_loaded());
}
