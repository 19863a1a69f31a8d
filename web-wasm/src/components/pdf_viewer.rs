//! 埋め込みPDF（到達確認後にだけ src を設定）

use leptos::prelude::*;
use leptos::task::spawn_local;
use scene_guide_common::card::{
    PdfEmbed, PdfViewState, PDF_DOWNLOAD_LABEL, PDF_FALLBACK_NOTE, PDF_VIEW_LABEL,
};

use crate::loader::probe;

#[component]
pub fn PdfViewer(pdf: PdfEmbed) -> impl IntoView {
    let (state, set_state) = signal(PdfViewState::Probing);

    {
        let url = pdf.url.clone();
        spawn_local(async move {
            let reachable = probe(&url).await;
            if !reachable {
                log::warn!("PDF viewer blocked: {}", url);
            }
            set_state.set(PdfViewState::after_probe(reachable));
        });
    }

    let viewer_src = pdf.viewer_src();
    let frame_src = move || (state.get() == PdfViewState::Ready).then(|| viewer_src.clone());
    let frame_display = move || if state.get().frame_visible() { "block" } else { "none" };
    let note_display = move || if state.get().note_visible() { "block" } else { "none" };

    view! {
        <div class="actions">
            <a class="btn" href=pdf.url.clone() target="_blank" rel="noreferrer">{PDF_VIEW_LABEL}</a>
            <a class="btn" href=pdf.url.clone() download="">{PDF_DOWNLOAD_LABEL}</a>
        </div>
        <iframe
            class="pdf-frame"
            {..::leptos::tachys::html::attribute::loading("lazy")}
            title=pdf.title.clone()
            src=frame_src
            style:display=frame_display
        ></iframe>
        <p class="note" id=pdf.fallback_id() style:display=note_display>
            {PDF_FALLBACK_NOTE}
        </p>
    }
}
