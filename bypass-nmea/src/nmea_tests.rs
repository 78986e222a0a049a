mod tests {
    use crate::vtg::frame;
    use crate::*;
    use alloc::format;

    fn xor(body: &str) -> u8 {
        let mut sum = 0u8;
        for b in body.as_bytes() {
            sum ^= *b;
        }
        sum
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            libm::fabs(actual - expected) < 1e-6,
            "{} != {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_vtg_at_rest() {
        let sentence = encode_vtg(0.0, 0.0);
        let body = "GPVTG,0.0,T,,M,0.00,N,0.00,K";
        assert_eq!(sentence, format!("${}*{:02X}", body, xor(body)));
        assert_eq!(sentence, "$GPVTG,0.0,T,,M,0.00,N,0.00,K*60");
    }

    #[test]
    fn test_vtg_knots() {
        assert_eq!(encode_vtg(90.0, 100.0), "$GPVTG,90.0,T,,M,54.00,N,100.00,K*69");
        assert_eq!(encode_vtg(359.94, 12.0), "$GPVTG,359.9,T,,M,6.48,N,12.00,K*5F");
    }

    #[test]
    fn test_vtg_heading_field() {
        for tenth in 0..3600 {
            let heading = tenth as f64 / 10.0 + 0.01;
            let sentence = encode_vtg(heading, 0.0);
            let field = sentence.split(',').nth(1).unwrap();
            assert_eq!(field, format!("{:.1}", heading));
            assert!(!field.starts_with('-'));
        }
    }

    #[test]
    fn test_vtg_never_negative() {
        assert_eq!(encode_vtg(-0.0, 0.0), encode_vtg(0.0, 0.0));
        assert!(encode_vtg(-90.0, 0.0).starts_with("$GPVTG,270.0,"));
        assert!(encode_vtg(f64::NAN, 0.0).starts_with("$GPVTG,0.0,"));
    }

    #[test]
    fn test_checksum_zero_padded() {
        // 'A' ^ 'B' == 0x03
        assert_eq!(checksum("AB"), 0x03);
        assert_eq!(frame("AB"), "$AB*03");
    }

    #[test]
    fn test_vtg_parses_back() {
        let sentence = encode_vtg(123.45, 88.0);
        if let Sentence::Vtg(vtg) = parse(&sentence).unwrap() {
            assert_close(vtg.true_track.unwrap(), 123.5);
            assert_eq!(vtg.magnetic_track, None);
            assert_close(vtg.speed_knots.unwrap(), 47.52);
            assert_close(vtg.speed_kmh.unwrap(), 88.0);
        } else {
            panic!("expected VTG");
        }
    }

    #[test]
    fn test_rmc() {
        let line = "$GPRMC,081836,A,3751.65,S,14507.36,E,000.0,360.0,140923,011.3,E*65\r\n";
        let sentence = parse(line).unwrap();

        if let Sentence::Rmc(rmc) = &sentence {
            assert_eq!(rmc.utc_time, Some(((8 * 60 + 18) * 60 + 36) * 1000));
            assert_eq!(rmc.status, Some(Status::Active));
            assert_close(rmc.latitude.unwrap(), -37.860833333);
            assert_close(rmc.longitude.unwrap(), 145.122666667);
            assert_eq!(rmc.speed_over_ground, Some(0.0));
            assert_eq!(rmc.course_over_ground, Some(360.0));
            assert_eq!(rmc.date, Some(19614));
            assert_eq!(rmc.magnetic_variation, Some(11.3));
            assert_eq!(rmc.mode, None);
        } else {
            panic!("expected RMC");
        }

        let (lat, lon) = sentence.position().unwrap();
        assert_close(lat, -37.860833333);
        assert_close(lon, 145.122666667);
    }

    #[test]
    fn test_rmc_leap_year_date() {
        let line = "$GPRMC,225446,A,4916.45,N,12311.12,W,000.5,054.7,010324,020.3,E*69";
        if let Sentence::Rmc(rmc) = parse(line).unwrap() {
            assert_eq!(rmc.date, Some(19783));
            assert!(rmc.longitude.unwrap() < 0.0);
        } else {
            panic!("expected RMC");
        }
    }

    #[test]
    fn test_rmc_void_has_no_position() {
        let line = "$GNRMC,083559.00,V,,,,,,,091202,,,N*69";
        let sentence = parse(line).unwrap();
        if let Sentence::Rmc(rmc) = &sentence {
            assert_eq!(rmc.status, Some(Status::Void));
            assert_eq!(rmc.latitude, None);
            assert_eq!(rmc.mode, Some(Mode::NotValid));
        } else {
            panic!("expected RMC");
        }
        assert_eq!(sentence.position(), None);
    }

    #[test]
    fn test_gga() {
        let line = "$GNGGA,001043.00,4404.14036,N,12118.85961,W,1,12,0.98,1113.0,M,-21.3,M,,*47";
        let sentence = parse(line).unwrap();
        if let Sentence::Gga(gga) = &sentence {
            assert_eq!(gga.utc_time, Some((10 * 60 + 43) * 1000));
            assert_eq!(gga.fix_quality, Some(1));
            assert_eq!(gga.satellites, Some(12));
            assert_eq!(gga.hdop, Some(0.98));
            assert_eq!(gga.altitude, Some(1113.0));
        } else {
            panic!("expected GGA");
        }

        let (lat, lon) = sentence.position().unwrap();
        assert_close(lat, 44.069006);
        assert_close(lon, -121.314326833);
    }

    #[test]
    fn test_gga_without_fix() {
        let line = "$GPGGA,092750.000,5321.6802,N,00630.3372,W,0,00,,,M,,M,,*51";
        let sentence = parse(line).unwrap();
        assert!(matches!(sentence, Sentence::Gga(_)));
        assert_eq!(sentence.position(), None);
    }

    #[test]
    fn test_other_sentences() {
        let line = "$GPGSV,3,1,11,03,03,111,00,04,15,270,00,06,01,010,00,13,06,292,00*74";
        assert_eq!(parse(line), Ok(Sentence::Other));
    }

    #[test]
    fn test_checksum_is_optional() {
        let line = "$GPRMC,081836,A,3751.65,S,14507.36,E,000.0,360.0,140923,011.3,E";
        assert!(parse(line).unwrap().position().is_some());
    }

    #[test]
    fn test_malformed() {
        assert_eq!(parse(""), Err(ParseError::MissingStart));
        assert_eq!(parse("GPRMC,081836,A"), Err(ParseError::MissingStart));
        assert_eq!(parse("$GP"), Err(ParseError::BadHeader));
        assert_eq!(
            parse("$GPRMC,081836,A,3751.65,S,14507.36,E,000.0,360.0,140923,011.3,E*66"),
            Err(ParseError::BadChecksum {
                expected: 0x66,
                actual: 0x65
            })
        );
        assert_eq!(
            parse("$GPRMC,081836,A,3751.65,S,14507.36,E,000.0,360.0,140923,011.3,E*Z1"),
            Err(ParseError::InvalidField("checksum"))
        );
        assert_eq!(parse("$GPRMC,081836,A,3751.65"), Err(ParseError::Truncated));
        assert_eq!(
            parse("$GPGGA,001043.00,44x4.1,N,12118.85961,W,1,12,0.98,1113.0,M,-21.3,M,,"),
            Err(ParseError::InvalidField("latitude"))
        );
        assert_eq!(
            parse("$GPGGA,001043.00,4404.1,Q,12118.85961,W,1,12,0.98,1113.0,M,-21.3,M,,"),
            Err(ParseError::InvalidField("latitude"))
        );
        assert_eq!(
            parse("$GPRMC,081836,A,3751.65,S,14507.36,E,000.0,360.0,991323,011.3,E"),
            Err(ParseError::InvalidField("date"))
        );
    }
    #[test]
    fn test_non_ascii_time_field() {
        assert_eq!(
            parse("$GPRMC,a\u{e9}bcdef,A,3751.65,S,14507.36,E,000.0,360.0,140923,011.3,E"),
            Err(ParseError::InvalidField("time"))
        );
        assert_eq!(
            parse("$GPGGA,12\u{20ac}456,4404.1,N,12118.85961,W,1,12,0.98,1113.0,M,-21.3,M,,"),
            Err(ParseError::InvalidField("time"))
        );
    }

    #[test]
    fn test_days_per_month() {
        let rmc = |date: &str| {
            parse(&format!(
                "$GPRMC,081836,A,3751.65,S,14507.36,E,000.0,360.0,{},011.3,E",
                date
            ))
        };

        for date in ["310224", "300224", "310424", "290223", "000124"] {
            assert_eq!(rmc(date), Err(ParseError::InvalidField("date")), "{}", date);
        }
        for date in ["290224", "300424", "310124", "280223"] {
            assert!(rmc(date).is_ok(), "{}", date);
        }
    }
}
