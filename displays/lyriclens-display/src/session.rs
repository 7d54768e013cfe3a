//! Display session
//!
//! Owns everything that lives across frames: the device profile, the display
//! mode agreed with the bridge, the art cache, and the encoder buffers.
//! Exclusive access goes through `&mut self`; callers that share a session
//! between contexts wrap it in their own lock.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use log::{debug, info, warn};
use lyriclens_core::{
    ArtLoader, BridgeError, ConfigError, DeviceProfile, DisplayBridge, ImageContainer,
    ImagePayload, ListContainer,
};
use lyriclens_png::{EncodeError, GrayscaleEncoder};

use crate::art::ArtCache;
use crate::canvas::PixelBuffer;
use crate::compositor::{compose, compose_splash, ComposeError, FrameDescription};
use crate::list::{frame_containers, startup_containers};
use crate::text::TextRenderer;

/// How frames reach the glasses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// Full-frame PNG images into one image container
    ImageCapable,
    /// Four text list containers
    TextOnlyFallback,
}

/// Session errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// Bridge accepted neither an image page nor a list page
    NoDisplayCapability,
    /// Profile is unusable
    Config(ConfigError),
    /// Frame could not be encoded
    Encode(EncodeError),
}

impl From<ConfigError> for SessionError {
    fn from(e: ConfigError) -> Self {
        SessionError::Config(e)
    }
}

impl From<ComposeError> for SessionError {
    fn from(e: ComposeError) -> Self {
        match e {
            ComposeError::Config(e) => SessionError::Config(e),
        }
    }
}

impl From<EncodeError> for SessionError {
    fn from(e: EncodeError) -> Self {
        SessionError::Encode(e)
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NoDisplayCapability => write!(f, "no usable display container"),
            SessionError::Config(e) => write!(f, "{}", e),
            SessionError::Encode(e) => write!(f, "{}", e),
        }
    }
}

/// A frame ready for the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedFrame {
    /// Encoded PNG bytes
    Image(Vec<u8>),
    /// Full replacement list page
    TextList(Vec<ListContainer>),
}

/// Per-device rendering state
pub struct DisplaySession<T> {
    profile: DeviceProfile,
    mode: DisplayMode,
    text: T,
    art: ArtCache,
    encoder: GrayscaleEncoder,
}

impl<T: TextRenderer> DisplaySession<T> {
    /// Session with a mode that is already known
    pub fn new(profile: DeviceProfile, mode: DisplayMode, text: T) -> Result<Self, SessionError> {
        profile.validate()?;
        Ok(Self {
            profile,
            mode,
            text,
            art: ArtCache::new(),
            encoder: GrayscaleEncoder::new(),
        })
    }

    /// Agree on a display mode with the bridge and set up the start-up page
    ///
    /// Tries a full-screen image container first and shows the splash frame
    /// in it. If the bridge refuses, the page is shut down and the text-list
    /// layout is tried instead.
    pub fn negotiate<B>(profile: DeviceProfile, text: T, bridge: &mut B) -> Result<Self, SessionError>
    where
        B: DisplayBridge + ?Sized,
    {
        profile.validate()?;

        let image = ImageContainer {
            id: profile.container_id,
            name: String::from(profile.container_name.as_str()),
            x: 0,
            y: 0,
            width: profile.width,
            height: profile.height,
        };
        match bridge.create_image_page(&image) {
            Ok(()) => {
                info!("display mode: image ({}x{})", profile.width, profile.height);
                let mut session = Self::new(profile, DisplayMode::ImageCapable, text)?;
                session.show_splash(bridge)?;
                return Ok(session);
            }
            Err(e) => warn!("image container rejected: {}", e),
        }

        if let Err(e) = bridge.shutdown_page() {
            debug!("shutdown before list fallback failed: {}", e);
        }

        match bridge.create_list_page(&startup_containers(&profile)) {
            Ok(()) => {
                info!("display mode: text list fallback");
                Self::new(profile, DisplayMode::TextOnlyFallback, text)
            }
            Err(e) => {
                warn!("list containers rejected: {}", e);
                Err(SessionError::NoDisplayCapability)
            }
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn art_cache(&self) -> &ArtCache {
        &self.art
    }

    /// Compose a frame without encoding it
    ///
    /// Art is resolved through the cache; a failed load renders the no-art
    /// layout.
    pub fn compose<L>(&mut self, desc: &FrameDescription<'_>, loader: &mut L) -> Result<PixelBuffer, SessionError>
    where
        L: ArtLoader + ?Sized,
    {
        let art = self
            .art
            .resolve(desc.art_source, self.profile.layout.art_size, loader);
        Ok(compose(&self.profile, desc, art, &self.text)?)
    }

    /// Render one frame for the negotiated mode
    pub fn render<L>(&mut self, desc: &FrameDescription<'_>, loader: &mut L) -> Result<RenderedFrame, SessionError>
    where
        L: ArtLoader + ?Sized,
    {
        match self.mode {
            DisplayMode::ImageCapable => {
                let canvas = self.compose(desc, loader)?;
                self.encode(&canvas)
            }
            DisplayMode::TextOnlyFallback => {
                Ok(RenderedFrame::TextList(frame_containers(&self.profile, desc)))
            }
        }
    }

    /// The waiting screen for the negotiated mode
    pub fn splash(&mut self) -> Result<RenderedFrame, SessionError> {
        match self.mode {
            DisplayMode::ImageCapable => {
                let canvas = compose_splash(&self.profile, &self.text)?;
                self.encode(&canvas)
            }
            DisplayMode::TextOnlyFallback => {
                Ok(RenderedFrame::TextList(startup_containers(&self.profile)))
            }
        }
    }

    /// Owned copy of the encoded frame; `update` and `show_splash` send
    /// straight from the encoder buffer instead
    fn encode(&mut self, canvas: &PixelBuffer) -> Result<RenderedFrame, SessionError> {
        Ok(RenderedFrame::Image(encode_frame(&mut self.encoder, canvas)?.to_vec()))
    }

    /// Send a rendered frame to the bridge
    ///
    /// Bridge failures are logged and dropped; the next frame is sent as
    /// usual. Returns whether the bridge accepted the frame.
    pub fn present<B>(&self, frame: &RenderedFrame, bridge: &mut B) -> bool
    where
        B: DisplayBridge + ?Sized,
    {
        match frame {
            RenderedFrame::Image(png) => send_image(&self.profile, png, bridge),
            RenderedFrame::TextList(containers) => send_list(containers, bridge),
        }
    }

    /// Render and present in one step
    pub fn update<L, B>(&mut self, desc: &FrameDescription<'_>, loader: &mut L, bridge: &mut B) -> Result<bool, SessionError>
    where
        L: ArtLoader + ?Sized,
        B: DisplayBridge + ?Sized,
    {
        match self.mode {
            DisplayMode::ImageCapable => {
                let canvas = self.compose(desc, loader)?;
                let png = encode_frame(&mut self.encoder, &canvas)?;
                Ok(send_image(&self.profile, png, bridge))
            }
            DisplayMode::TextOnlyFallback => {
                Ok(send_list(&frame_containers(&self.profile, desc), bridge))
            }
        }
    }

    /// Put the waiting screen on the glasses
    pub fn show_splash<B>(&mut self, bridge: &mut B) -> Result<bool, SessionError>
    where
        B: DisplayBridge + ?Sized,
    {
        match self.mode {
            DisplayMode::ImageCapable => {
                let canvas = compose_splash(&self.profile, &self.text)?;
                let png = encode_frame(&mut self.encoder, &canvas)?;
                Ok(send_image(&self.profile, png, bridge))
            }
            DisplayMode::TextOnlyFallback => {
                Ok(send_list(&startup_containers(&self.profile), bridge))
            }
        }
    }

    /// Tear down the page on the glasses, ending the session
    pub fn close<B>(self, bridge: &mut B) -> T
    where
        B: DisplayBridge + ?Sized,
    {
        if let Err(e) = bridge.shutdown_page() {
            warn!("failed to clear glasses display: {}", e);
        }
        self.text
    }
}

fn encode_frame<'e>(encoder: &'e mut GrayscaleEncoder, canvas: &PixelBuffer) -> Result<&'e [u8], SessionError> {
    let png = encoder.encode(canvas.width(), canvas.height(), canvas.pixels())?;
    debug!("frame encoded: {} bytes", png.len());
    Ok(png)
}

fn send_image<B>(profile: &DeviceProfile, png: &[u8], bridge: &mut B) -> bool
where
    B: DisplayBridge + ?Sized,
{
    let payload = ImagePayload::from_png(profile.container_id, profile.container_name.as_str(), png);
    accepted(bridge.update_image(&payload))
}

fn send_list<B>(containers: &[ListContainer], bridge: &mut B) -> bool
where
    B: DisplayBridge + ?Sized,
{
    accepted(bridge.rebuild_list_page(containers))
}

fn accepted(result: Result<(), BridgeError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!("failed to send frame to glasses: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::tests::BlockGlyphs;
    use alloc::vec;
    use lyriclens_core::{ArtError, ArtRaster, PixelFormat};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        CreateImage(ImageContainer),
        CreateList(usize),
        RebuildList(Vec<ListContainer>),
        UpdateImage(ImagePayload),
        Shutdown,
    }

    #[derive(Default)]
    struct MockBridge {
        image_ok: bool,
        list_ok: bool,
        fail_updates: bool,
        calls: Vec<Call>,
    }

    fn status(ok: bool) -> Result<(), BridgeError> {
        if ok {
            Ok(())
        } else {
            Err(BridgeError::Rejected(-1))
        }
    }

    impl DisplayBridge for MockBridge {
        fn create_image_page(&mut self, container: &ImageContainer) -> Result<(), BridgeError> {
            self.calls.push(Call::CreateImage(container.clone()));
            status(self.image_ok)
        }

        fn create_list_page(&mut self, containers: &[ListContainer]) -> Result<(), BridgeError> {
            self.calls.push(Call::CreateList(containers.len()));
            status(self.list_ok)
        }

        fn rebuild_list_page(&mut self, containers: &[ListContainer]) -> Result<(), BridgeError> {
            self.calls.push(Call::RebuildList(containers.to_vec()));
            status(!self.fail_updates)
        }

        fn update_image(&mut self, payload: &ImagePayload) -> Result<(), BridgeError> {
            self.calls.push(Call::UpdateImage(payload.clone()));
            status(!self.fail_updates)
        }

        fn shutdown_page(&mut self) -> Result<(), BridgeError> {
            self.calls.push(Call::Shutdown);
            Err(BridgeError::Transport)
        }
    }

    fn no_art(_: &str) -> Result<ArtRaster, ArtError> {
        Err(ArtError::Unreachable)
    }

    fn frame<'a>() -> FrameDescription<'a> {
        FrameDescription {
            track: "Song",
            artist: "Band",
            current_line: Some("now"),
            progress: 0.5,
            total_ms: 1000,
            art_source: Some("cover"),
            ..FrameDescription::default()
        }
    }

    #[test]
    fn test_negotiate_image_mode_sends_splash() {
        let mut bridge = MockBridge {
            image_ok: true,
            ..MockBridge::default()
        };
        let session = DisplaySession::negotiate(DeviceProfile::default(), BlockGlyphs, &mut bridge).unwrap();

        assert_eq!(session.mode(), DisplayMode::ImageCapable);
        assert_eq!(bridge.calls.len(), 2);
        match &bridge.calls[0] {
            Call::CreateImage(c) => {
                assert_eq!((c.id, c.name.as_str(), c.width, c.height), (100, "lyrics", 576, 200));
            }
            other => panic!("unexpected call {:?}", other),
        }
        match &bridge.calls[1] {
            Call::UpdateImage(payload) => {
                let png = payload.png_bytes().unwrap();
                let image = lyriclens_png::decode(&png).unwrap();
                assert_eq!((image.width, image.height), (576, 200));
                let splash = compose_splash(&DeviceProfile::default(), &BlockGlyphs).unwrap();
                assert_eq!(image.pixels, splash.pixels());
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_negotiate_with_loaded_profile() {
        let profile = lyriclens_core::parse_profile(
            "width = 640\nheight = 240\ncontainer_id = 7\ncontainer_name = \"frame\"\n",
        )
        .unwrap();
        let mut bridge = MockBridge {
            image_ok: true,
            ..MockBridge::default()
        };
        DisplaySession::negotiate(profile, BlockGlyphs, &mut bridge).unwrap();

        match &bridge.calls[1] {
            Call::UpdateImage(payload) => {
                assert_eq!((payload.container_id, payload.container_name.as_str()), (7, "frame"));
                let image = lyriclens_png::decode(&payload.png_bytes().unwrap()).unwrap();
                assert_eq!((image.width, image.height), (640, 240));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_negotiate_falls_back_to_list() {
        let mut bridge = MockBridge {
            list_ok: true,
            ..MockBridge::default()
        };
        let session = DisplaySession::negotiate(DeviceProfile::default(), BlockGlyphs, &mut bridge).unwrap();

        assert_eq!(session.mode(), DisplayMode::TextOnlyFallback);
        assert!(matches!(bridge.calls[0], Call::CreateImage(_)));
        assert_eq!(bridge.calls[1], Call::Shutdown);
        assert_eq!(bridge.calls[2], Call::CreateList(4));
    }

    #[test]
    fn test_negotiate_without_capability() {
        let mut bridge = MockBridge::default();
        let result = DisplaySession::negotiate(DeviceProfile::default(), BlockGlyphs, &mut bridge);
        assert!(matches!(result, Err(SessionError::NoDisplayCapability)));
    }

    #[test]
    fn test_negotiate_rejects_invalid_profile() {
        let mut bridge = MockBridge::default();
        let profile = DeviceProfile {
            width: 0,
            ..DeviceProfile::default()
        };
        let result = DisplaySession::negotiate(profile, BlockGlyphs, &mut bridge);
        assert!(matches!(result, Err(SessionError::Config(_))));
        assert!(bridge.calls.is_empty());
    }

    #[test]
    fn test_render_image_with_failed_art() {
        let mut session =
            DisplaySession::new(DeviceProfile::default(), DisplayMode::ImageCapable, BlockGlyphs).unwrap();
        let frame_png = match session.render(&frame(), &mut no_art).unwrap() {
            RenderedFrame::Image(png) => png,
            other => panic!("unexpected frame {:?}", other),
        };

        let expected = compose(&DeviceProfile::default(), &frame(), None, &BlockGlyphs).unwrap();
        let decoded = lyriclens_png::decode(&frame_png).unwrap();
        assert_eq!(decoded.pixels, expected.pixels());
        assert_eq!(session.art_cache().cached_source(), None);
    }

    #[test]
    fn test_render_uses_art_cache() {
        let mut session =
            DisplaySession::new(DeviceProfile::default(), DisplayMode::ImageCapable, BlockGlyphs).unwrap();
        let mut loads = 0;
        let mut loader = |_: &str| -> Result<ArtRaster, ArtError> {
            loads += 1;
            ArtRaster::new(1, 1, PixelFormat::Rgb, vec![255, 255, 255])
        };

        let canvas = session.compose(&frame(), &mut loader).unwrap();
        assert_eq!(canvas.get(8, 6), Some(255));
        session.compose(&frame(), &mut loader).unwrap();
        drop(loader);
        assert_eq!(loads, 1);
        assert_eq!(session.art_cache().cached_source(), Some("cover"));
    }

    #[test]
    fn test_render_list_mode() {
        let mut session =
            DisplaySession::new(DeviceProfile::default(), DisplayMode::TextOnlyFallback, BlockGlyphs).unwrap();
        match session.render(&frame(), &mut no_art).unwrap() {
            RenderedFrame::TextList(containers) => {
                assert_eq!(containers.len(), 4);
                assert_eq!(containers[2].items.names, ["now"]);
            }
            other => panic!("unexpected frame {:?}", other),
        }
    }

    #[test]
    fn test_present_swallows_bridge_failure() {
        let mut bridge = MockBridge {
            fail_updates: true,
            ..MockBridge::default()
        };
        let mut session =
            DisplaySession::new(DeviceProfile::default(), DisplayMode::ImageCapable, BlockGlyphs).unwrap();

        assert_eq!(session.update(&frame(), &mut no_art, &mut bridge), Ok(false));
        bridge.fail_updates = false;
        assert_eq!(session.update(&frame(), &mut no_art, &mut bridge), Ok(true));
        assert_eq!(bridge.calls.len(), 2);
    }

    #[test]
    fn test_update_matches_render() {
        let mut bridge = MockBridge::default();
        let mut session =
            DisplaySession::new(DeviceProfile::default(), DisplayMode::ImageCapable, BlockGlyphs).unwrap();

        assert_eq!(session.update(&frame(), &mut no_art, &mut bridge), Ok(true));
        let rendered = match session.render(&frame(), &mut no_art).unwrap() {
            RenderedFrame::Image(png) => png,
            other => panic!("unexpected frame {:?}", other),
        };
        match &bridge.calls[..] {
            [Call::UpdateImage(payload)] => {
                assert_eq!(payload.png_bytes().unwrap(), rendered);
                let expected = compose(&DeviceProfile::default(), &frame(), None, &BlockGlyphs).unwrap();
                let decoded = lyriclens_png::decode(&rendered).unwrap();
                assert_eq!(decoded.pixels, expected.pixels());
            }
            other => panic!("unexpected calls {:?}", other),
        }
    }

    #[test]
    fn test_show_splash_in_list_mode() {
        let mut bridge = MockBridge::default();
        let mut session =
            DisplaySession::new(DeviceProfile::default(), DisplayMode::TextOnlyFallback, BlockGlyphs).unwrap();

        assert_eq!(session.show_splash(&mut bridge), Ok(true));
        match &bridge.calls[..] {
            [Call::RebuildList(containers)] => {
                assert_eq!(containers, &startup_containers(&DeviceProfile::default()));
            }
            other => panic!("unexpected calls {:?}", other),
        }
    }

    #[test]
    fn test_close_shuts_page_down() {
        let mut bridge = MockBridge::default();
        let session =
            DisplaySession::new(DeviceProfile::default(), DisplayMode::TextOnlyFallback, BlockGlyphs).unwrap();
        session.close(&mut bridge);
        assert_eq!(bridge.calls, [Call::Shutdown]);
    }
}
