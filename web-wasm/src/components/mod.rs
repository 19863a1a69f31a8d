pub mod audio_player;
pub mod card;
pub mod checklist;
pub mod chips;
pub mod pdf_viewer;
pub mod top;
