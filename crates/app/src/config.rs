//! Command-line configuration.
//! Flags: --mesh=PATH --texture=PATH --size=WxH --width=N --height=N --disco=F --spin=F

use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub mesh: PathBuf,
    pub texture: PathBuf,
    pub width: u32,
    pub height: u32,
    pub disco: f32,
    pub spin: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mesh: PathBuf::from("teapot.bin"),
            texture: PathBuf::from("logo.png"),
            width: 1280,
            height: 720,
            disco: 0.0,
            spin: 0.0,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_args(std::env::args().skip(1))
    }

    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cfg = Self::default();
        let mut w: Option<u32> = None;
        let mut h: Option<u32> = None;

        for arg in args {
            let arg = arg.as_ref();
            if let Some(v) = arg.strip_prefix("--mesh=") {
                cfg.mesh = PathBuf::from(v);
            } else if let Some(v) = arg.strip_prefix("--texture=") {
                cfg.texture = PathBuf::from(v);
            } else if let Some(v) = arg.strip_prefix("--size=") {
                match v.split_once('x').or_else(|| v.split_once('X')) {
                    Some((sw, sh)) => {
                        if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                            w = Some(pw);
                            h = Some(ph);
                        } else {
                            log::warn!("Ignoring malformed size '{}'", v);
                        }
                    }
                    None => log::warn!("Ignoring malformed size '{}', expected WxH", v),
                }
            } else if let Some(v) = arg.strip_prefix("--width=") {
                match v.parse::<u32>() {
                    Ok(pw) => w = Some(pw),
                    Err(_) => log::warn!("Ignoring malformed width '{}'", v),
                }
            } else if let Some(v) = arg.strip_prefix("--height=") {
                match v.parse::<u32>() {
                    Ok(ph) => h = Some(ph),
                    Err(_) => log::warn!("Ignoring malformed height '{}'", v),
                }
            } else if let Some(v) = arg.strip_prefix("--disco=") {
                match v.parse::<f32>() {
                    Ok(d) if d.is_finite() => cfg.disco = d.clamp(0.0, 1.0),
                    _ => log::warn!("Ignoring disco factor '{}', falling back to 0", v),
                }
            } else if let Some(v) = arg.strip_prefix("--spin=") {
                match v.parse::<f32>() {
                    Ok(s) if s.is_finite() => cfg.spin = s,
                    _ => log::warn!("Ignoring spin '{}'", v),
                }
            } else {
                log::warn!("Unknown argument '{}'", arg);
            }
        }

        cfg.width = w.unwrap_or(cfg.width).max(1);
        cfg.height = h.unwrap_or(cfg.height).max(1);
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_args() {
        assert_eq!(Config::from_args(Vec::<String>::new()), Config::default());
    }

    #[test]
    fn parses_every_flag() {
        let cfg = Config::from_args([
            "--mesh=assets/pot.bin",
            "--texture=assets/tile.png",
            "--size=640x480",
            "--disco=0.5",
            "--spin=1.25",
        ]);
        assert_eq!(cfg.mesh, PathBuf::from("assets/pot.bin"));
        assert_eq!(cfg.texture, PathBuf::from("assets/tile.png"));
        assert_eq!((cfg.width, cfg.height), (640, 480));
        assert_eq!(cfg.disco, 0.5);
        assert_eq!(cfg.spin, 1.25);
    }

    #[test]
    fn width_and_height_override_size_and_clamp() {
        let cfg = Config::from_args(["--size=640X480", "--height=0"]);
        assert_eq!((cfg.width, cfg.height), (640, 1));
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = Config::from_args(["--disco=7", "--spin=fast", "--size=huge", "--bogus"]);
        assert_eq!(cfg.disco, 1.0);
        assert_eq!(cfg.spin, 0.0);
        assert_eq!((cfg.width, cfg.height), (1280, 720));
    }

    #[test]
    fn bad_width_and_height_keep_earlier_values() {
        let cfg = Config::from_args(["--size=800x600", "--width=wide", "--height=-3"]);
        assert_eq!((cfg.width, cfg.height), (800, 600));
    }
}
