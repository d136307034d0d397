use super::*;
use crate::raster::Channels;

fn args_of(cmd: &Command) -> Vec<String> {
    cmd.get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        frame_count: 1,
    }
}

#[test]
fn transparent_pixels_become_background() {
    let frame = ImageF32::filled(1, 1, Channels::Rgba, &[1.0, 1.0, 1.0, 0.0]).unwrap();
    let mut dst = vec![0u8; 4];
    flatten_over_background(&mut dst, &frame, [10, 20, 30]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn half_alpha_mixes_with_background() {
    let frame = ImageF32::filled(1, 1, Channels::Rgba, &[1.0, 0.0, 0.0, 0.5]).unwrap();
    let mut dst = vec![0u8; 4];
    flatten_over_background(&mut dst, &frame, [0, 0, 0]).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn rgb_frames_are_opaque() {
    let frame = ImageF32::filled(2, 1, Channels::Rgb, &[0.0, 1.0, 0.0]).unwrap();
    let mut dst = vec![0u8; 8];
    flatten_over_background(&mut dst, &frame, [255, 255, 255]).unwrap();
    assert_eq!(dst, vec![0, 255, 0, 255, 0, 255, 0, 255]);
    assert!(flatten_over_background(&mut [0u8; 4], &frame, [0, 0, 0]).is_err());
}

#[test]
fn command_muxes_audio_with_shortest() {
    let mut opts = FfmpegSinkOpts::new("target/unit_ffmpeg/out.mp4", 24);
    opts.audio = Some(PathBuf::from("song.mp3"));
    let args = args_of(&FfmpegSink::new(opts).command(&cfg(4, 2)));
    assert!(args.windows(2).any(|w| w == ["-s", "4x2"]));
    assert!(args.windows(2).any(|w| w == ["-r", "24"]));
    assert!(args.windows(2).any(|w| w == ["-i", "song.mp3"]));
    assert!(args.windows(2).any(|w| w == ["-c:v", "libx264"]));
    assert!(args.iter().any(|a| a == "-shortest"));
    assert_eq!(args.last().map(String::as_str), Some("target/unit_ffmpeg/out.mp4"));
}

#[test]
fn silent_command_disables_audio() {
    let mut opts = FfmpegSinkOpts::new("o.mp4", 30);
    opts.codec = "libx265".to_owned();
    let args = args_of(&FfmpegSink::new(opts).command(&cfg(2, 2)));
    assert!(args.iter().any(|a| a == "-an"));
    assert!(args.windows(2).any(|w| w == ["-c:v", "libx265"]));
    assert!(!args.iter().any(|a| a == "-shortest"));
}

#[test]
fn begin_rejects_bad_geometry_and_missing_audio() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/unit_ffmpeg/odd.mp4", 30));
    assert!(matches!(
        sink.begin(cfg(3, 2)),
        Err(LayercastError::Validation(_))
    ));

    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/unit_ffmpeg/zero.mp4", 0));
    assert!(sink.begin(cfg(2, 2)).is_err());

    let mut opts = FfmpegSinkOpts::new("target/unit_ffmpeg/a.mp4", 30);
    opts.audio = Some(PathBuf::from("target/unit_ffmpeg/definitely-missing.wav"));
    let mut sink = FfmpegSink::new(opts);
    assert!(matches!(sink.begin(cfg(2, 2)), Err(LayercastError::Input(_))));
}
