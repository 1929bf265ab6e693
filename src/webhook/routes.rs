use ntex::web;

/// Configures the LINE webhook route.
///
/// The route is public; authenticity is checked per request from the
/// `X-Line-Signature` header.
///
/// # Routes
/// - `POST /callback` - LINE webhook receiver
pub fn line(cfg: &mut web::ServiceConfig) {
    cfg.service((super::line::callback,));
}
