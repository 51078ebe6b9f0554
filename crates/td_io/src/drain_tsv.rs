// crates/td_io/src/drain_tsv.rs

//! 排水路径 TSV 读写
//!
//! 每行一条路径，点之间制表符分隔，点内坐标逗号分隔：
//!
//! ```text
//! 0.5,0.5,2.0<TAB>1.5,0.5,1.0<TAB>1.5,1.5,0.0
//! ```
//!
//! 行顺序与路径在结果集中的顺序一致，空行非法。

use crate::error::{IoError, IoResult};
use glam::DVec3;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// 写出路径集合到文件
pub fn write_paths(path: &Path, paths: &[Vec<DVec3>]) -> IoResult<()> {
    let file = File::create(path).map_err(|e| IoError::file(path.display().to_string(), e))?;
    let mut writer = BufWriter::new(file);
    write_paths_to(&mut writer, paths).map_err(|e| IoError::file(path.display().to_string(), e))
}

/// 写出路径集合到任意写入器
pub fn write_paths_to<W: Write>(writer: &mut W, paths: &[Vec<DVec3>]) -> std::io::Result<()> {
    for pts in paths {
        let mut first = true;
        for p in pts {
            if !first {
                write!(writer, "\t")?;
            }
            write!(writer, "{},{},{}", p.x, p.y, p.z)?;
            first = false;
        }
        writeln!(writer)?;
    }
    writer.flush()
}

/// 从文件读入路径集合
pub fn read_paths(path: &Path) -> IoResult<Vec<Vec<DVec3>>> {
    let file = File::open(path).map_err(|e| IoError::file(path.display().to_string(), e))?;
    read_paths_from(BufReader::new(file), &path.display().to_string())
}

/// 从任意读取器读入路径集合
pub fn read_paths_from<R: Read>(reader: R, name: &str) -> IoResult<Vec<Vec<DVec3>>> {
    let reader = BufReader::new(reader);
    let mut paths = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| IoError::file(name.to_string(), e))?;
        let lineno = lineno + 1;
        if line.trim().is_empty() {
            return Err(IoError::parse(name, lineno, "空行（路径至少含一个点）"));
        }

        let mut pts = Vec::new();
        for token in line.split('\t') {
            pts.push(parse_point(token, name, lineno)?);
        }
        paths.push(pts);
    }
    Ok(paths)
}

/// 解析 `x,y,z` 坐标
fn parse_point(token: &str, name: &str, lineno: usize) -> IoResult<DVec3> {
    let parts: Vec<&str> = token.split(',').collect();
    if parts.len() != 3 {
        return Err(IoError::parse(
            name,
            lineno,
            format!("坐标应为 x,y,z 三元组: '{token}'"),
        ));
    }
    let mut coords = [0.0; 3];
    for (i, part) in parts.iter().enumerate() {
        coords[i] = part.trim().parse::<f64>().map_err(|_| {
            IoError::parse(name, lineno, format!("无法解析坐标分量: '{part}'"))
        })?;
    }
    Ok(DVec3::from_array(coords))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_roundtrip_two_paths() {
        let paths = vec![
            vec![DVec3::new(0.5, 0.5, 2.0), DVec3::new(1.5, 0.5, 1.0)],
            vec![DVec3::new(3.0, 3.0, 0.0)],
        ];

        let mut buf = Vec::new();
        write_paths_to(&mut buf, &paths).unwrap();
        let loaded = read_paths_from(Cursor::new(buf), "mem").unwrap();
        assert_eq!(loaded, paths);
    }

    #[test]
    fn test_single_point_path_line() {
        let loaded = read_paths_from(Cursor::new("1,2,3\n"), "mem").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0], vec![DVec3::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn test_empty_line_rejected() {
        let err = read_paths_from(Cursor::new("1,2,3\n\n"), "mem").unwrap_err();
        assert!(matches!(err, IoError::ParseError { line: 2, .. }));
    }

    #[test]
    fn test_malformed_point_rejected() {
        assert!(read_paths_from(Cursor::new("1,2\n"), "mem").is_err());
        assert!(read_paths_from(Cursor::new("a,b,c\n"), "mem").is_err());
    }

    #[test]
    fn test_line_count_matches_path_count() {
        let paths = vec![vec![DVec3::ZERO]; 7];
        let mut buf = Vec::new();
        write_paths_to(&mut buf, &paths).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 7);
    }
}
