mod tests {
    use std::collections::VecDeque;
    use std::io::{self, Cursor, Read};
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::{Duration, Instant};

    use crate::consts::MAX_LINE_LEN;
    use crate::error::DeviceError;
    use crate::retry::RetryPolicy;
    use crate::state::{self, SharedTelemetry};
    use crate::task_gps::{GpsTask, PortOpener};

    const MELBOURNE: &str =
        "$GPRMC,081836,A,3751.65,S,14507.36,E,000.0,360.0,140923,011.3,E*65\r\n";
    const OREGON: &str =
        "$GNGGA,001043.00,4404.14036,N,12118.85961,W,1,12,0.98,1113.0,M,-21.3,M,,*47\r\n";
    const VOID_RMC: &str = "$GNRMC,083559.00,V,,,,,,,091202,,,N*69\r\n";
    const NO_FIX_GGA: &str = "$GPGGA,092750.000,5321.6802,N,00630.3372,W,0,00,,,M,,M,,*51\r\n";
    const SATELLITES: &str =
        "$GPGSV,3,1,11,03,03,111,00,04,15,270,00,06,01,010,00,13,06,292,00*74\r\n";

    type Script = VecDeque<Result<Vec<u8>, DeviceError>>;

    /// Hands out scripted streams, then fails forever. Records when it was asked.
    struct ScriptedOpener {
        script: Script,
        opened_at: Arc<Mutex<Vec<Instant>>>,
    }

    impl PortOpener for ScriptedOpener {
        type Port = Cursor<Vec<u8>>;

        fn open(&mut self) -> Result<Self::Port, DeviceError> {
            self.opened_at.lock().unwrap().push(Instant::now());
            match self.script.pop_front() {
                Some(stream) => stream.map(Cursor::new),
                None => Err(DeviceError::Serial(io::Error::new(
                    io::ErrorKind::NotFound,
                    "unplugged",
                ))),
            }
        }
    }

    /// Yields its data, then a hard read error
    struct Broken(Cursor<Vec<u8>>);

    impl Read for Broken {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::BrokenPipe, "cable pulled")),
                n => Ok(n),
            }
        }
    }

    fn task(state: &SharedTelemetry) -> GpsTask<ScriptedOpener> {
        GpsTask::new(
            ScriptedOpener {
                script: Script::new(),
                opened_at: Arc::default(),
            },
            state.clone(),
            RetryPolicy::new(Duration::from_millis(1)),
        )
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
    }

    #[test]
    fn test_handle_line() {
        let state = state::shared();
        let mut gps = task(&state);

        assert!(!gps.handle_line(VOID_RMC.as_bytes()));
        assert!(!gps.handle_line(NO_FIX_GGA.as_bytes()));
        assert!(!gps.handle_line(SATELLITES.as_bytes()));
        assert!(state::lock(&state).position().is_none());

        assert!(gps.handle_line(MELBOURNE.as_bytes()));
        let position = state::lock(&state).position().unwrap();
        assert_close(position.latitude, -37.860833333);
        assert_close(position.longitude, 145.122666667);

        // none of these move it
        assert!(!gps.handle_line(b"garbage\r\n"));
        assert!(!gps.handle_line(b"\xff\xfe$GPRMC\r\n"));
        assert!(!gps.handle_line(MELBOURNE.replace("*65", "*66").as_bytes()));
        assert!(!gps.handle_line(&MELBOURNE.as_bytes()[..30]));
        assert!(!gps.handle_line(VOID_RMC.as_bytes()));
        assert_eq!(state::lock(&state).position(), Some(position));

        assert!(gps.handle_line(OREGON.as_bytes()));
        let position = state::lock(&state).position().unwrap();
        assert_close(position.latitude, 44.069006);
        assert_close(position.longitude, -121.31432683);
    }

    #[test]
    fn test_session_ends_on_eof() {
        let state = state::shared();
        let mut gps = task(&state);

        let stream = [SATELLITES, "$GPRMC,081836,A,37", "\r\n", OREGON, VOID_RMC].concat();
        match gps.session(Cursor::new(stream.into_bytes())) {
            DeviceError::Serial(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected {:?}", other),
        }
        assert_close(state::lock(&state).position().unwrap().latitude, 44.069006);
    }

    #[test]
    fn test_session_drops_overlong_lines() {
        let state = state::shared();
        let mut gps = task(&state);

        // the GGA lands exactly at a buffer boundary, still part of the noise line
        let noise = "x".repeat(MAX_LINE_LEN * 2);
        let stream = [noise.as_str(), OREGON, NO_FIX_GGA].concat();
        gps.session(Cursor::new(stream.into_bytes()));
        assert!(state::lock(&state).position().is_none());

        // a sentence after the over-long line is read normally
        let noise = "$".repeat(MAX_LINE_LEN * 3 + 7);
        let stream = [noise.as_str(), "\r\n", MELBOURNE].concat();
        gps.session(Cursor::new(stream.into_bytes()));
        assert_close(state::lock(&state).position().unwrap().latitude, -37.860833333);
    }

    #[test]
    fn test_session_ends_on_read_error() {
        let state = state::shared();
        let mut gps = task(&state);

        let port = Broken(Cursor::new(MELBOURNE.as_bytes().to_vec()));
        match gps.session(port) {
            DeviceError::Serial(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected {:?}", other),
        }
        assert!(state::lock(&state).position().is_some());
    }

    #[test]
    fn test_reconnect_after_delay() {
        let delay = Duration::from_millis(30);
        let state = state::shared();
        let opened_at = Arc::new(Mutex::new(Vec::new()));

        let script: Script = [
            Err(DeviceError::Serial(io::Error::new(
                io::ErrorKind::NotFound,
                "not yet",
            ))),
            Ok(NO_FIX_GGA.as_bytes().to_vec()),
            Ok(MELBOURNE.as_bytes().to_vec()),
        ]
        .into_iter()
        .collect();

        let gps = GpsTask::new(
            ScriptedOpener {
                script,
                opened_at: opened_at.clone(),
            },
            state.clone(),
            RetryPolicy::new(delay),
        );
        // never returns, left running when the test ends
        thread::spawn(move || gps.run());

        let deadline = Instant::now() + Duration::from_secs(5);
        while state::lock(&state).position().is_none() {
            assert!(Instant::now() < deadline, "no position after reconnecting");
            thread::sleep(Duration::from_millis(5));
        }

        let opened_at = opened_at.lock().unwrap().clone();
        assert!(opened_at.len() >= 3);
        for pair in opened_at.windows(2) {
            assert!(pair[1] - pair[0] >= delay);
        }
        assert_close(state::lock(&state).position().unwrap().latitude, -37.860833333);
    }
}
